//! Deposit lifecycle error types.

use propledger_shared::types::DepositId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::DepositStatus;
use crate::compliance::Jurisdiction;

/// Errors that can occur during deposit lifecycle operations.
#[derive(Debug, Error)]
pub enum DepositError {
    /// Deposit not found.
    #[error("Security deposit not found: {0}")]
    DepositNotFound(DepositId),

    /// Requested transition is not in the state machine's table.
    #[error("Invalid deposit transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: DepositStatus,
        /// Requested status.
        to: DepositStatus,
    },

    /// Deposit already reached a terminal state.
    #[error("Deposit {0} is already disposed")]
    AlreadyDisposed(DepositId),

    /// Deposit amount exceeds the jurisdiction's statutory cap.
    #[error("Deposit of {attempted} exceeds {jurisdiction} maximum of {months} months rent ({cap})")]
    ComplianceLimitExceeded {
        /// The jurisdiction whose cap was exceeded.
        jurisdiction: Jurisdiction,
        /// Cap expressed in months of rent.
        months: Decimal,
        /// The computed dollar cap, formatted for display.
        cap: String,
        /// The attempted amount, formatted for display.
        attempted: String,
    },

    /// Deduction would exceed the deposit's remaining balance.
    #[error("Deduction of {attempted} exceeds remaining deposit balance of {remaining}")]
    DeductionExceedsDeposit {
        /// Remaining balance, formatted for display.
        remaining: String,
        /// The attempted deduction, formatted for display.
        attempted: String,
    },

    /// Deduction amounts must be positive.
    #[error("Deduction amount must be positive")]
    InvalidDeductionAmount,

    /// Forfeiture requires no itemized deductions.
    #[error("Deposit {0} has itemized deductions; use disposition, not forfeiture")]
    ForfeitRequiresNoDeductions(DepositId),
}

impl DepositError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DepositNotFound(_) => "DEPOSIT_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::AlreadyDisposed(_) => "ALREADY_DISPOSED",
            Self::ComplianceLimitExceeded { .. } => "COMPLIANCE_LIMIT_EXCEEDED",
            Self::DeductionExceedsDeposit { .. } => "DEDUCTION_EXCEEDS_DEPOSIT",
            Self::InvalidDeductionAmount => "INVALID_DEDUCTION_AMOUNT",
            Self::ForfeitRequiresNoDeductions(_) => "FORFEIT_REQUIRES_NO_DEDUCTIONS",
        }
    }
}
