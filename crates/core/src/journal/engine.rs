//! The journal posting engine.
//!
//! An append-only, in-memory ledger of record. Entries are created
//! atomically (entry plus lines under one write lock) and never mutated
//! after posting; the only permitted state change is `Posted -> Void`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;
use propledger_shared::types::{JournalEntryId, JournalLineId, PartyId};

use super::error::JournalError;
use super::types::{
    EntryStatus, JournalEntry, JournalLine, PostingInput, ReferenceKind,
};
use super::validation::validate_lines;
use crate::accounts::ChartOfAccounts;

/// The journal engine: validates and records balanced postings.
pub struct JournalEngine {
    chart: Arc<ChartOfAccounts>,
    entries: RwLock<Vec<JournalEntry>>,
    index: DashMap<JournalEntryId, usize>,
    idempotency: DashMap<String, JournalEntryId>,
    next_sequence: AtomicU64,
}

impl JournalEngine {
    /// Creates an engine over the given chart of accounts.
    #[must_use]
    pub fn new(chart: Arc<ChartOfAccounts>) -> Self {
        Self {
            chart,
            entries: RwLock::new(Vec::new()),
            index: DashMap::new(),
            idempotency: DashMap::new(),
            next_sequence: AtomicU64::new(1),
        }
    }

    /// Returns the chart of accounts this engine posts against.
    #[must_use]
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// Validates and posts an entry.
    ///
    /// On success the entry is assigned the next sequence number and status
    /// `Posted`. All lines are persisted with the entry or none are. If the
    /// input carries an idempotency key already seen, the original entry is
    /// returned and nothing is posted.
    ///
    /// # Errors
    ///
    /// Returns a `JournalError` if validation fails; no state changes.
    pub fn post(&self, input: PostingInput) -> Result<JournalEntry, JournalError> {
        validate_lines(&input.lines, &self.chart)?;

        let mut entries = self.write_entries();

        // Idempotency check happens under the write lock so a retried call
        // racing the original observes the committed entry.
        if let Some(key) = &input.idempotency_key {
            if let Some(existing) = self.idempotency.get(key) {
                let idx = self
                    .index
                    .get(existing.value())
                    .map(|entry| *entry.value())
                    .ok_or(JournalError::EntryNotFound(*existing.value()))?;
                tracing::debug!(key = %key, "idempotent replay, returning original entry");
                return Ok(entries[idx].clone());
            }
        }

        let entry_id = JournalEntryId::new();
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);

        let lines: Vec<JournalLine> = input
            .lines
            .into_iter()
            .map(|line| JournalLine {
                id: JournalLineId::new(),
                entry_id,
                account: line.account,
                side: line.side,
                amount: line.amount,
                memo: line.memo,
                party: line.party,
                property: line.property,
                unit: line.unit,
            })
            .collect();

        let entry = JournalEntry {
            id: entry_id,
            sequence,
            date: input.date,
            description: input.description,
            reference: input.reference,
            status: EntryStatus::Posted,
            lines,
            void_reason: None,
        };

        let idx = entries.len();
        entries.push(entry.clone());
        self.index.insert(entry_id, idx);
        if let Some(key) = input.idempotency_key {
            self.idempotency.insert(key, entry_id);
        }

        tracing::debug!(
            entry = %entry.sequence_display(),
            reference = ?entry.reference.kind,
            "posted journal entry"
        );
        Ok(entry)
    }

    /// Voids a posted entry.
    ///
    /// Lines are retained for audit; from this point the entry is excluded
    /// from every balance derivation. No reversing entry is generated -
    /// callers that need a reversal post a new balancing entry explicitly.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `AlreadyVoid`.
    pub fn void(
        &self,
        entry_id: JournalEntryId,
        reason: impl Into<String>,
    ) -> Result<JournalEntry, JournalError> {
        let mut entries = self.write_entries();
        let idx = self
            .index
            .get(&entry_id)
            .map(|entry| *entry.value())
            .ok_or(JournalError::EntryNotFound(entry_id))?;

        let entry = &mut entries[idx];
        if entry.status == EntryStatus::Void {
            return Err(JournalError::AlreadyVoid(entry_id));
        }
        entry.status = EntryStatus::Void;
        entry.void_reason = Some(reason.into());

        tracing::info!(entry = %entry.sequence_display(), "voided journal entry");
        Ok(entry.clone())
    }

    /// Looks up an entry by ID.
    #[must_use]
    pub fn entry(&self, entry_id: JournalEntryId) -> Option<JournalEntry> {
        let entries = self.read_entries();
        self.index
            .get(&entry_id)
            .map(|idx| entries[*idx.value()].clone())
    }

    /// Snapshot of all entries (any status), in sequence order.
    #[must_use]
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.read_entries().clone()
    }

    /// Snapshot of posted entries only.
    #[must_use]
    pub fn posted_entries(&self) -> Vec<JournalEntry> {
        self.read_entries()
            .iter()
            .filter(|entry| entry.status.counts_toward_balances())
            .cloned()
            .collect()
    }

    /// Posted entries caused by a given kind of business event.
    #[must_use]
    pub fn posted_with_reference(&self, kind: ReferenceKind) -> Vec<JournalEntry> {
        self.read_entries()
            .iter()
            .filter(|entry| {
                entry.status.counts_toward_balances() && entry.reference.kind == kind
            })
            .cloned()
            .collect()
    }

    /// All posted lines tagged with the given party.
    #[must_use]
    pub fn posted_lines_for_party(&self, party: PartyId) -> Vec<JournalLine> {
        self.read_entries()
            .iter()
            .filter(|entry| entry.status.counts_toward_balances())
            .flat_map(|entry| entry.lines.iter())
            .filter(|line| line.party == Some(party))
            .cloned()
            .collect()
    }

    /// Number of entries recorded (any status).
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.read_entries().len()
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, Vec<JournalEntry>> {
        self.entries.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, Vec<JournalEntry>> {
        self.entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::registry::codes;
    use crate::journal::types::{LineInput, Reference, Side};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn engine() -> JournalEngine {
        JournalEngine::new(Arc::new(ChartOfAccounts::standard_chart()))
    }

    fn balanced_input(amount: Decimal) -> PostingInput {
        PostingInput {
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: "Deposit collection".to_string(),
            reference: Reference::new(ReferenceKind::DepositCollection, "dep-1"),
            lines: vec![
                LineInput::new(codes::TRUST_CASH, Side::Debit, amount),
                LineInput::new(codes::DEPOSIT_LIABILITY, Side::Credit, amount),
            ],
            idempotency_key: None,
        }
    }

    #[test]
    fn test_post_assigns_sequence_and_status() {
        let engine = engine();
        let first = engine.post(balanced_input(dec!(2000))).unwrap();
        let second = engine.post(balanced_input(dec!(2500))).unwrap();

        assert_eq!(first.sequence, 1);
        assert_eq!(second.sequence, 2);
        assert_eq!(first.status, EntryStatus::Posted);
        assert_eq!(first.sequence_display(), "JE-000001");
    }

    #[test]
    fn test_post_rejects_imbalanced() {
        let engine = engine();
        let mut input = balanced_input(dec!(2000));
        input.lines[1].amount = dec!(1500);

        assert!(matches!(
            engine.post(input),
            Err(JournalError::ImbalancedEntry { .. })
        ));
        assert_eq!(engine.entry_count(), 0);
    }

    #[test]
    fn test_post_is_atomic_on_rejection() {
        let engine = engine();
        let mut input = balanced_input(dec!(100));
        input.lines.push(LineInput::new("9999", Side::Debit, dec!(1)));

        assert!(engine.post(input).is_err());
        assert_eq!(engine.entry_count(), 0);
    }

    #[test]
    fn test_idempotency_key_posts_once() {
        let engine = engine();
        let mut input = balanced_input(dec!(2000));
        input.idempotency_key = Some("settle-abc".to_string());

        let first = engine.post(input.clone()).unwrap();
        let replay = engine.post(input).unwrap();

        assert_eq!(first.id, replay.id);
        assert_eq!(engine.entry_count(), 1);
    }

    #[test]
    fn test_void_retains_lines_and_excludes_from_balances() {
        let engine = engine();
        let entry = engine.post(balanced_input(dec!(2000))).unwrap();

        let voided = engine.void(entry.id, "posted in error").unwrap();
        assert_eq!(voided.status, EntryStatus::Void);
        assert_eq!(voided.lines.len(), 2);
        assert_eq!(voided.void_reason.as_deref(), Some("posted in error"));

        assert!(engine.posted_entries().is_empty());
        assert_eq!(engine.entry_count(), 1);
    }

    #[test]
    fn test_void_twice_fails() {
        let engine = engine();
        let entry = engine.post(balanced_input(dec!(2000))).unwrap();
        engine.void(entry.id, "first").unwrap();

        assert!(matches!(
            engine.void(entry.id, "second"),
            Err(JournalError::AlreadyVoid(_))
        ));
    }

    #[test]
    fn test_void_unknown_entry() {
        let engine = engine();
        assert!(matches!(
            engine.void(JournalEntryId::new(), "nope"),
            Err(JournalError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_posted_lines_for_party() {
        let engine = engine();
        let party = PartyId::new();
        let other = PartyId::new();

        let mut input = balanced_input(dec!(1500));
        input.lines[0] = LineInput::new(codes::ACCOUNTS_RECEIVABLE, Side::Debit, dec!(1500))
            .with_party(party);
        input.lines[1] = LineInput::new(codes::RENT_INCOME, Side::Credit, dec!(1500));
        engine.post(input).unwrap();

        assert_eq!(engine.posted_lines_for_party(party).len(), 1);
        assert!(engine.posted_lines_for_party(other).is_empty());
    }

    #[test]
    fn test_posted_with_reference() {
        let engine = engine();
        engine.post(balanced_input(dec!(100))).unwrap();

        assert_eq!(
            engine
                .posted_with_reference(ReferenceKind::DepositCollection)
                .len(),
            1
        );
        assert!(engine
            .posted_with_reference(ReferenceKind::LateFee)
            .is_empty());
    }
}
