//! Account registry error types.

use thiserror::Error;

use super::types::AccountCode;

/// Errors raised by chart-of-accounts lookups.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account code is not registered.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountCode),

    /// Account exists but is inactive.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountCode),

    /// Account code is already registered.
    #[error("Account {0} is already registered")]
    DuplicateAccount(AccountCode),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
        }
    }
}
