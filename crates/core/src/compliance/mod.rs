//! Per-jurisdiction statutory rule table.
//!
//! Jurisdictions form a closed set; each carries a strongly-typed rule
//! record. The only fallible path is parsing a jurisdiction code from a
//! string at the system boundary.

pub mod error;
pub mod table;
pub mod types;

pub use error::ComplianceError;
pub use table::{max_deposit, rules_for};
pub use types::{ComplianceRule, DepositCap, Jurisdiction, LateFeeFormula};
