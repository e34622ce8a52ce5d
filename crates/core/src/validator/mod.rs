//! Out-of-band consistency audit.
//!
//! Runs against live state without mutating it. Four checks: double-entry
//! balance, trust reconciliation, statutory compliance, and party balance
//! drift. Findings carry a severity so operators can separate "stop and
//! investigate" from "worth a look".

pub mod audit;
pub mod types;

pub use audit::ConsistencyValidator;
pub use types::{CheckKind, Finding, Severity, ValidationReport};
