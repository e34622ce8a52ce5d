//! Engine-level error facade.

use propledger_shared::ErrorClass;
use thiserror::Error;

use crate::accounts::AccountError;
use crate::compliance::ComplianceError;
use crate::deposit::DepositError;
use crate::journal::JournalError;

/// Any error the engine facade can surface.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Journal posting or lookup failed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Deposit lifecycle operation failed.
    #[error(transparent)]
    Deposit(#[from] DepositError),

    /// Compliance rule lookup failed.
    #[error(transparent)]
    Compliance(#[from] ComplianceError),

    /// Account registry lookup failed.
    #[error(transparent)]
    Account(#[from] AccountError),

    /// Lock acquisition exhausted its retry budget.
    #[error("Operation on {subject} contended after {attempts} attempts; retry")]
    LockContended {
        /// What the operation was trying to lock (deposit ID, party ID).
        subject: String,
        /// Attempts made before giving up.
        attempts: u32,
    },
}

impl EngineError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Journal(err) => err.error_code(),
            Self::Deposit(err) => err.error_code(),
            Self::Compliance(err) => err.error_code(),
            Self::Account(err) => err.error_code(),
            Self::LockContended { .. } => "LOCK_CONTENDED",
        }
    }

    /// Broad classification used for retry and status-code policy.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Journal(err) => match err {
                JournalError::ImbalancedEntry { .. } => ErrorClass::Invariant,
                JournalError::EntryNotFound(_) => ErrorClass::NotFound,
                _ => ErrorClass::Validation,
            },
            Self::Deposit(err) => match err {
                DepositError::DepositNotFound(_) => ErrorClass::NotFound,
                DepositError::ComplianceLimitExceeded { .. } => ErrorClass::Compliance,
                _ => ErrorClass::Validation,
            },
            Self::Compliance(_) | Self::Account(_) => ErrorClass::Validation,
            Self::LockContended { .. } => ErrorClass::Conflict,
        }
    }

    /// Returns true if the caller may retry the operation unchanged.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.class().is_retryable()
    }
}
