//! Financial ledger and trust-account compliance engine for Propledger.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts registry
//! - `compliance` - Per-jurisdiction statutory rule table
//! - `journal` - Double-entry journal engine
//! - `trust` - Segregated trust pools for security deposits
//! - `deposit` - Security deposit lifecycle state machine
//! - `latefee` - Statutory late fee calculator
//! - `balance` - Party balance projection
//! - `validator` - Out-of-band consistency audit
//! - `engine` - The orchestrating facade

pub mod accounts;
pub mod balance;
pub mod compliance;
pub mod deposit;
pub mod engine;
pub mod error;
pub mod journal;
pub mod latefee;
pub mod trust;
pub mod validator;

pub use engine::LedgerEngine;
pub use error::EngineError;
