//! Chart of accounts registry.
//!
//! The chart is fixed and small: this is a property-management ledger, not
//! a general ledger. Every other module references accounts by code.

pub mod error;
pub mod registry;
pub mod types;

pub use error::AccountError;
pub use registry::ChartOfAccounts;
pub use types::{Account, AccountCode, AccountType, NormalBalance};
