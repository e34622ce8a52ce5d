//! Property tests for deduction and disposition invariants.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::lifecycle::{plan_disposition, validate_deduction};
use super::types::{Deduction, DeductionCategory, DepositStatus, SecurityDeposit};
use crate::compliance::Jurisdiction;
use propledger_shared::types::{DeductionId, DepositId, LeaseId, PartyId};

fn cents(c: i64) -> Decimal {
    Decimal::new(c, 2)
}

fn pending_deposit(principal: Decimal, interest: Decimal) -> SecurityDeposit {
    let collected = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    SecurityDeposit {
        id: DepositId::new(),
        party: PartyId::new(),
        lease: LeaseId::new(),
        jurisdiction: Jurisdiction::Nc,
        principal,
        interest_accrued: interest,
        monthly_rent_at_collection: principal,
        collected_on: collected,
        accrued_through: collected,
        status: DepositStatus::PendingReturn,
        move_out_date: Some(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()),
        refund_deadline: Some(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap()),
        inspection_notes: None,
        deductions: Vec::new(),
        disposition: None,
    }
}

/// Applies a sequence of deduction attempts the way the engine does:
/// validate first, push only on acceptance.
fn apply_attempts(deposit: &mut SecurityDeposit, attempts: &[Decimal]) {
    for amount in attempts {
        if validate_deduction(deposit, *amount).is_ok() {
            deposit.deductions.push(Deduction {
                id: DeductionId::new(),
                category: DeductionCategory::Repair,
                amount: *amount,
                description: "damage".to_string(),
                documentation_ref: None,
            });
        }
    }
}

fn principal_strategy() -> impl Strategy<Value = Decimal> {
    // $100.00 to $5,000.00
    (10_000i64..500_000i64).prop_map(cents)
}

fn interest_strategy() -> impl Strategy<Value = Decimal> {
    // $0.00 to $50.00
    (0i64..5_000i64).prop_map(cents)
}

fn attempts_strategy() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((1i64..400_000i64).prop_map(cents), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Under any sequence of accepted and rejected deduction attempts, the
    /// running total never exceeds principal + accrued interest, and a
    /// rejected attempt leaves the deposit unchanged.
    #[test]
    fn prop_deduction_sum_bounded(
        principal in principal_strategy(),
        interest in interest_strategy(),
        attempts in attempts_strategy(),
    ) {
        let mut deposit = pending_deposit(principal, interest);
        for amount in attempts {
            let before = deposit.deductions.len();
            match validate_deduction(&deposit, amount) {
                Ok(()) => deposit.deductions.push(Deduction {
                    id: DeductionId::new(),
                    category: DeductionCategory::Repair,
                    amount,
                    description: "damage".to_string(),
                    documentation_ref: None,
                }),
                Err(_) => prop_assert_eq!(deposit.deductions.len(), before),
            }
            prop_assert!(
                deposit.total_deductions() <= deposit.principal + deposit.interest_accrued
            );
        }
    }

    /// Whatever deduction sequence was accepted, the planned refund is
    /// never negative and always equals principal + interest minus the
    /// deduction total.
    #[test]
    fn prop_refund_never_negative(
        principal in principal_strategy(),
        interest in interest_strategy(),
        attempts in attempts_strategy(),
    ) {
        let mut deposit = pending_deposit(principal, interest);
        apply_attempts(&mut deposit, &attempts);

        let plan = plan_disposition(
            &deposit,
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            None,
        )
        .unwrap();

        prop_assert!(plan.refund >= Decimal::ZERO);
        prop_assert_eq!(
            plan.refund,
            deposit.principal + deposit.interest_accrued - deposit.total_deductions()
        );
    }

    /// The principal/interest split is exact: each posting's parts sum to
    /// its deduction, and the split total plus the refund split accounts
    /// for every cent of the deposit.
    #[test]
    fn prop_disposition_split_is_exact(
        principal in principal_strategy(),
        interest in interest_strategy(),
        attempts in attempts_strategy(),
    ) {
        let mut deposit = pending_deposit(principal, interest);
        apply_attempts(&mut deposit, &attempts);

        let plan = plan_disposition(
            &deposit,
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            None,
        )
        .unwrap();

        let mut split_principal = Decimal::ZERO;
        let mut split_interest = Decimal::ZERO;
        for posting in &plan.deduction_postings {
            prop_assert_eq!(
                posting.from_principal + posting.from_interest,
                posting.deduction.amount
            );
            prop_assert!(posting.from_principal >= Decimal::ZERO);
            prop_assert!(posting.from_interest >= Decimal::ZERO);
            split_principal += posting.from_principal;
            split_interest += posting.from_interest;
        }

        prop_assert_eq!(split_principal + plan.refund_from_principal, deposit.principal);
        prop_assert_eq!(split_interest + plan.refund_from_interest, deposit.interest_accrued);
        prop_assert_eq!(plan.refund_from_principal + plan.refund_from_interest, plan.refund);
    }
}
