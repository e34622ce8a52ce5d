//! Property tests for balanced-posting validation.

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::JournalEngine;
use super::types::{LineInput, PostingInput, Reference, ReferenceKind, Side};
use super::validation::validate_lines;
use crate::accounts::registry::codes;
use crate::accounts::ChartOfAccounts;

/// Strategy for positive cent amounts up to $100,000.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn split_strategy() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(amount_strategy(), 1..6)
}

fn posting(lines: Vec<LineInput>) -> PostingInput {
    PostingInput {
        date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        description: "Generated posting".to_string(),
        reference: Reference::new(ReferenceKind::Adjustment, "prop"),
        lines,
        idempotency_key: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any posting built from debit splits mirrored by a single credit of
    /// the same total is accepted, and the stored entry balances to zero.
    #[test]
    fn prop_balanced_split_accepted(debits in split_strategy()) {
        let chart = ChartOfAccounts::standard_chart();
        let total: Decimal = debits.iter().copied().sum();

        let mut lines: Vec<LineInput> = debits
            .iter()
            .map(|amount| LineInput::new(codes::ACCOUNTS_RECEIVABLE, Side::Debit, *amount))
            .collect();
        lines.push(LineInput::new(codes::RENT_INCOME, Side::Credit, total));

        prop_assert!(validate_lines(&lines, &chart).is_ok());

        let engine = JournalEngine::new(Arc::new(chart));
        let entry = engine.post(posting(lines)).unwrap();
        let totals = entry.totals();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.difference(), Decimal::ZERO);
    }

    /// Any posting whose sides differ by more than the ledger tolerance is
    /// rejected and leaves the journal untouched.
    #[test]
    fn prop_imbalanced_rejected(
        amount in amount_strategy(),
        skew_cents in 1i64..100_000i64,
    ) {
        let chart = ChartOfAccounts::standard_chart();
        let skewed = amount + Decimal::new(skew_cents, 2);
        let lines = vec![
            LineInput::new(codes::ACCOUNTS_RECEIVABLE, Side::Debit, amount),
            LineInput::new(codes::RENT_INCOME, Side::Credit, skewed),
        ];

        prop_assert!(validate_lines(&lines, &chart).is_err());

        let engine = JournalEngine::new(Arc::new(chart));
        prop_assert!(engine.post(posting(lines)).is_err());
        prop_assert_eq!(engine.entry_count(), 0);
    }

    /// Sequence numbers strictly increase across accepted postings.
    #[test]
    fn prop_sequence_strictly_increases(amounts in prop::collection::vec(amount_strategy(), 1..10)) {
        let engine = JournalEngine::new(Arc::new(ChartOfAccounts::standard_chart()));

        let mut last = 0u64;
        for amount in amounts {
            let lines = vec![
                LineInput::new(codes::TRUST_CASH, Side::Debit, amount),
                LineInput::new(codes::DEPOSIT_LIABILITY, Side::Credit, amount),
            ];
            let entry = engine.post(posting(lines)).unwrap();
            prop_assert!(entry.sequence > last);
            last = entry.sequence;
        }
    }

    /// Voiding never changes an entry's lines.
    #[test]
    fn prop_void_preserves_lines(amount in amount_strategy()) {
        let engine = JournalEngine::new(Arc::new(ChartOfAccounts::standard_chart()));
        let lines = vec![
            LineInput::new(codes::TRUST_CASH, Side::Debit, amount),
            LineInput::new(codes::DEPOSIT_LIABILITY, Side::Credit, amount),
        ];
        let entry = engine.post(posting(lines)).unwrap();
        let voided = engine.void(entry.id, "prop").unwrap();

        prop_assert_eq!(voided.lines.len(), entry.lines.len());
        for (before, after) in entry.lines.iter().zip(voided.lines.iter()) {
            prop_assert_eq!(before.amount, after.amount);
            prop_assert_eq!(&before.account, &after.account);
        }
    }
}
