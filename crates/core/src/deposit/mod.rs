//! Security deposit lifecycle.
//!
//! The state machine governing an individual deposit from collection to
//! final disposition, including deduction accumulation and interest
//! accrual. Trust pool movements and journal postings are orchestrated by
//! the engine facade; the logic here is pure.

pub mod error;
pub mod lifecycle;
pub mod store;
pub mod types;

#[cfg(test)]
mod lifecycle_props;

pub use error::DepositError;
pub use lifecycle::{
    plan_disposition, plan_forfeiture, validate_deduction, DeductionPosting, DispositionPlan,
};
pub use store::DepositStore;
pub use types::{
    Deduction, DeductionCategory, DepositStatus, Disposition, SecurityDeposit,
};
