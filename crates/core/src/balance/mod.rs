//! Party balance projection.
//!
//! Balances are never stored authoritatively: the journal is the source
//! of truth and the synchronizer maintains a cached projection derived
//! from posted lines on party-tracked accounts.

pub mod synchronizer;

pub use synchronizer::{BalanceSynchronizer, PartyBalance};
