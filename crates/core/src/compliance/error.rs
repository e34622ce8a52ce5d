//! Compliance rule table error types.

use thiserror::Error;

/// Errors raised at the compliance rule boundary.
#[derive(Debug, Error)]
pub enum ComplianceError {
    /// Jurisdiction code is not in the supported set.
    #[error("Unknown jurisdiction: {0}")]
    UnknownJurisdiction(String),
}

impl ComplianceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownJurisdiction(_) => "UNKNOWN_JURISDICTION",
        }
    }
}
