//! Journal domain types.

use chrono::NaiveDate;
use propledger_shared::types::{JournalEntryId, JournalLineId, PartyId, PropertyId, UnitId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountCode;

/// Side of a journal line: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

/// Journal entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry has been voided; lines are retained for audit but the entry
    /// is excluded from every balance derivation.
    Void,
}

impl EntryStatus {
    /// Returns true if the entry can be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Void)
    }

    /// Returns true if the entry participates in balance derivation.
    #[must_use]
    pub fn counts_toward_balances(&self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// Kind of business event that caused a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Monthly rent charge.
    RentCharge,
    /// Statutory late fee assessment.
    LateFee,
    /// Security deposit collection.
    DepositCollection,
    /// Deposit interest accrual.
    InterestAccrual,
    /// Deposit disposition (refund portion).
    DepositDisposition,
    /// Itemized deposit deduction.
    DepositDeduction,
    /// Manual correcting entry.
    Adjustment,
}

/// Reference to the business event that caused an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// The event kind.
    pub kind: ReferenceKind,
    /// Identifier of the originating record (deposit ID, lease ID, ...).
    pub id: String,
}

impl Reference {
    /// Creates a reference to a business event.
    #[must_use]
    pub fn new(kind: ReferenceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Input for a single line in a posting.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// The account to post to.
    pub account: AccountCode,
    /// Whether this is a debit or credit line.
    pub side: Side,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Optional memo for this line.
    pub memo: Option<String>,
    /// Party (tenant) tag for per-party balance derivation.
    pub party: Option<PartyId>,
    /// Property tag.
    pub property: Option<PropertyId>,
    /// Unit tag.
    pub unit: Option<UnitId>,
}

impl LineInput {
    /// Creates an untagged line.
    #[must_use]
    pub fn new(account: impl Into<AccountCode>, side: Side, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            side,
            amount,
            memo: None,
            party: None,
            property: None,
            unit: None,
        }
    }

    /// Tags the line with a party for balance derivation.
    #[must_use]
    pub fn with_party(mut self, party: PartyId) -> Self {
        self.party = Some(party);
        self
    }

    /// Attaches a memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// Input for creating a posting.
#[derive(Debug, Clone)]
pub struct PostingInput {
    /// The business date of the posting.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// The business event that caused this posting.
    pub reference: Reference,
    /// The lines (must have at least 2 and balance).
    pub lines: Vec<LineInput>,
    /// Optional idempotency key: a retried call with the same key posts
    /// the event at most once.
    pub idempotency_key: Option<String>,
}

/// A single line of a journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier for this line.
    pub id: JournalLineId,
    /// The entry this line belongs to.
    pub entry_id: JournalEntryId,
    /// The account posted to.
    pub account: AccountCode,
    /// Debit or credit.
    pub side: Side,
    /// The amount (always positive; the side carries the sign).
    pub amount: Decimal,
    /// Optional memo.
    pub memo: Option<String>,
    /// Party tag for per-party balance derivation.
    pub party: Option<PartyId>,
    /// Property tag.
    pub property: Option<PropertyId>,
    /// Unit tag.
    pub unit: Option<UnitId>,
}

impl JournalLine {
    /// Returns the debit amount (zero for credit lines).
    #[must_use]
    pub fn debit(&self) -> Decimal {
        match self.side {
            Side::Debit => self.amount,
            Side::Credit => Decimal::ZERO,
        }
    }

    /// Returns the credit amount (zero for debit lines).
    #[must_use]
    pub fn credit(&self) -> Decimal {
        match self.side {
            Side::Debit => Decimal::ZERO,
            Side::Credit => self.amount,
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.side {
            Side::Debit => self.amount,
            Side::Credit => -self.amount,
        }
    }
}

/// A journal entry: the atomic unit of posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Monotonically increasing sequence number.
    pub sequence: u64,
    /// Business date.
    pub date: NaiveDate,
    /// Free-text description.
    pub description: String,
    /// The business event that caused this entry.
    pub reference: Reference,
    /// Entry status.
    pub status: EntryStatus,
    /// The balanced lines.
    pub lines: Vec<JournalLine>,
    /// Reason recorded when the entry was voided.
    pub void_reason: Option<String>,
}

impl JournalEntry {
    /// Human-readable sequence number, e.g. `JE-000042`.
    #[must_use]
    pub fn sequence_display(&self) -> String {
        format!("JE-{:06}", self.sequence)
    }

    /// Computes the entry's debit/credit totals.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        let debits: Decimal = self.lines.iter().map(JournalLine::debit).sum();
        let credits: Decimal = self.lines.iter().map(JournalLine::credit).sum();
        EntryTotals::new(debits, credits)
    }
}

/// Entry totals for validation and display.
#[derive(Debug, Clone)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debits: Decimal,
    /// Total credit amount.
    pub credits: Decimal,
    /// Whether the entry balances within the ledger tolerance.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debits: Decimal, credits: Decimal) -> Self {
        Self {
            debits,
            credits,
            is_balanced: (debits - credits).abs()
                <= propledger_shared::types::LEDGER_TOLERANCE,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debits - self.credits
    }
}
