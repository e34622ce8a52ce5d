//! Segregated trust pools for security deposits.
//!
//! One cash pool per jurisdiction, legally segregated from operating
//! funds. Every deposit collection and disposition moves money through a
//! pool via journal postings; the consistency validator reconciles each
//! pool against the sum of held deposit principal.

pub mod pool;

pub use pool::{TrustAccount, TrustPools};
