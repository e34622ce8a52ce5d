//! Statutory late fee calculator.
//!
//! Pure functions with no side effects: callers are responsible for
//! posting the resulting amount through the journal engine.

pub mod calculator;

pub use calculator::{assess, statutory_maximum, LateFeeAssessment, LateFeeRecord};
