//! Error classification shared across the engine.

use serde::{Deserialize, Serialize};

/// Broad classification of engine failures, mirroring the propagation
/// policy: validation and compliance errors are safe to retry after
/// correcting input, conflicts are safe to retry as-is, invariant
/// violations are never auto-corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Caller's input is structurally wrong (unknown account, bad amount).
    Validation,
    /// Input is well-formed but violates a statutory rule.
    Compliance,
    /// An invariant the engine must uphold was violated.
    Invariant,
    /// Concurrent modification detected; retry the whole operation.
    Conflict,
    /// Referenced entity does not exist.
    NotFound,
}

impl ErrorClass {
    /// Returns true if the operation may be retried without changing input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }

    /// Returns the HTTP status code an API layer would map this class to.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Compliance => 422,
            Self::Invariant => 500,
            Self::Conflict => 409,
            Self::NotFound => 404,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classes() {
        assert!(ErrorClass::Conflict.is_retryable());
        assert!(!ErrorClass::Validation.is_retryable());
        assert!(!ErrorClass::Compliance.is_retryable());
        assert!(!ErrorClass::Invariant.is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorClass::Validation.status_code(), 400);
        assert_eq!(ErrorClass::Compliance.status_code(), 422);
        assert_eq!(ErrorClass::Conflict.status_code(), 409);
        assert_eq!(ErrorClass::NotFound.status_code(), 404);
        assert_eq!(ErrorClass::Invariant.status_code(), 500);
    }
}
