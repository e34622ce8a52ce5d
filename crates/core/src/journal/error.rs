//! Journal error types.

use propledger_shared::types::JournalEntryId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::accounts::AccountCode;

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Posting has no lines.
    #[error("Posting must have at least one line")]
    NoLines,

    /// Posting must have at least 2 lines.
    #[error("Posting must have at least 2 lines")]
    InsufficientLines,

    /// Posting has only one side (all debits or all credits).
    #[error("Posting must have both debit and credit lines")]
    SingleSided,

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Posting is not balanced (debits != credits beyond tolerance).
    #[error("Posting is not balanced. Debit: {debits}, Credit: {credits}")]
    ImbalancedEntry {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    // ========== Account Errors ==========
    /// Account code is not registered.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountCode),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountCode),

    // ========== Entry State Errors ==========
    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Entry is already void.
    #[error("Journal entry {0} is already void")]
    AlreadyVoid(JournalEntryId),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::SingleSided => "SINGLE_SIDED",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::ImbalancedEntry { .. } => "IMBALANCED_ENTRY",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyVoid(_) => "ALREADY_VOID",
        }
    }
}

impl From<crate::accounts::AccountError> for JournalError {
    fn from(err: crate::accounts::AccountError) -> Self {
        use crate::accounts::AccountError;
        match err {
            AccountError::UnknownAccount(code) | AccountError::DuplicateAccount(code) => {
                Self::UnknownAccount(code)
            }
            AccountError::AccountInactive(code) => Self::AccountInactive(code),
        }
    }
}
