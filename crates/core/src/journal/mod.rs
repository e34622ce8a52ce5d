//! Double-entry journal engine.
//!
//! This module implements the ledger of record:
//! - Journal entries and lines (debits and credits)
//! - Balanced-posting validation
//! - The append-only posting engine with void support
//! - Error types for journal operations

pub mod engine;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use engine::JournalEngine;
pub use error::JournalError;
pub use types::{
    EntryStatus, EntryTotals, JournalEntry, JournalLine, LineInput, PostingInput, Reference,
    ReferenceKind, Side,
};
pub use validation::validate_lines;
