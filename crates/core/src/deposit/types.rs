//! Security deposit domain types.

use chrono::NaiveDate;
use propledger_shared::types::{DeductionId, DepositId, LeaseId, PartyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::compliance::Jurisdiction;

/// Security deposit lifecycle status.
///
/// `Held` is initial; the four outcomes are terminal. Transitions go
/// through the fixed table in `can_transition_to` - there is no other way
/// to move between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    /// Deposit is held in the trust pool.
    Held,
    /// Move-out recorded; awaiting disposition.
    PendingReturn,
    /// Disposition in progress.
    Processing,
    /// Fully refunded, no deductions.
    Returned,
    /// Partially refunded after deductions.
    PartialRefund,
    /// Forfeited in full with no itemized deductions (explicit decision,
    /// e.g. tenant abandonment) - never inferred from deduction totals.
    Forfeited,
    /// Deductions consumed the entire balance.
    AppliedToDamages,
}

impl DepositStatus {
    /// Returns true if this is a terminal outcome.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Returned | Self::PartialRefund | Self::Forfeited | Self::AppliedToDamages
        )
    }

    /// The fixed transition table.
    #[must_use]
    pub fn can_transition_to(&self, to: Self) -> bool {
        match (self, to) {
            (Self::Held, Self::PendingReturn)
            | (Self::PendingReturn, Self::Processing) => true,
            (Self::PendingReturn | Self::Processing, outcome) => outcome.is_terminal(),
            // Held deposits may be forfeited directly (abandonment without
            // a recorded move-out).
            (Self::Held, Self::Forfeited) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            Self::Held => "held",
            Self::PendingReturn => "pending_return",
            Self::Processing => "processing",
            Self::Returned => "returned",
            Self::PartialRefund => "partial_refund",
            Self::Forfeited => "forfeited",
            Self::AppliedToDamages => "applied_to_damages",
        };
        write!(f, "{status}")
    }
}

/// Category of a deposit deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionCategory {
    /// Cleaning beyond normal wear.
    Cleaning,
    /// Repairs for damage.
    Repair,
    /// Unpaid rent applied against the deposit.
    UnpaidRent,
    /// Unpaid utility charges.
    UnpaidUtility,
    /// Anything else (must be described).
    Other,
}

/// An itemized deduction against a deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deduction {
    /// Unique identifier.
    pub id: DeductionId,
    /// Category of the deduction.
    pub category: DeductionCategory,
    /// Amount (positive).
    pub amount: Decimal,
    /// Description shown on the disposition statement.
    pub description: String,
    /// Optional reference to supporting documentation (photo, invoice).
    pub documentation_ref: Option<String>,
}

/// The finalized outcome of a deposit's lifecycle.
///
/// Created exactly once per deposit, immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disposition {
    /// Tenant move-out date.
    pub move_out_date: NaiveDate,
    /// Date the disposition completed.
    pub disposition_date: NaiveDate,
    /// Sum of itemized deductions.
    pub total_deductions: Decimal,
    /// Amount refunded to the tenant.
    pub refund_amount: Decimal,
    /// Whether the disposition completed within the jurisdiction's
    /// refund deadline.
    pub is_compliant: bool,
    /// Forwarding address for the refund check.
    pub forwarding_address: Option<String>,
}

/// A tenant security deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityDeposit {
    /// Unique identifier.
    pub id: DepositId,
    /// The tenant who paid the deposit.
    pub party: PartyId,
    /// The lease the deposit secures.
    pub lease: LeaseId,
    /// Governing jurisdiction.
    pub jurisdiction: Jurisdiction,
    /// Principal amount collected.
    pub principal: Decimal,
    /// Interest accrued to date (zero where not required).
    pub interest_accrued: Decimal,
    /// Monthly rent at collection time, retained so the validator can
    /// re-derive the statutory cap.
    pub monthly_rent_at_collection: Decimal,
    /// Collection date.
    pub collected_on: NaiveDate,
    /// Date through which interest has been accrued.
    pub accrued_through: NaiveDate,
    /// Current lifecycle status.
    pub status: DepositStatus,
    /// Move-out date, set by `begin_return`.
    pub move_out_date: Option<NaiveDate>,
    /// Refund deadline = move-out + jurisdiction deadline days.
    pub refund_deadline: Option<NaiveDate>,
    /// Inspection notes recorded at move-out.
    pub inspection_notes: Option<String>,
    /// Accumulated deductions.
    pub deductions: Vec<Deduction>,
    /// Final disposition, once the deposit reaches a terminal state.
    pub disposition: Option<Disposition>,
}

impl SecurityDeposit {
    /// Sum of itemized deductions.
    #[must_use]
    pub fn total_deductions(&self) -> Decimal {
        self.deductions.iter().map(|deduction| deduction.amount).sum()
    }

    /// Remaining balance available for deductions.
    #[must_use]
    pub fn remaining_balance(&self) -> Decimal {
        self.principal + self.interest_accrued - self.total_deductions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DepositStatus::Held, false)]
    #[case(DepositStatus::PendingReturn, false)]
    #[case(DepositStatus::Processing, false)]
    #[case(DepositStatus::Returned, true)]
    #[case(DepositStatus::PartialRefund, true)]
    #[case(DepositStatus::Forfeited, true)]
    #[case(DepositStatus::AppliedToDamages, true)]
    fn test_terminal_states(#[case] status: DepositStatus, #[case] terminal: bool) {
        assert_eq!(status.is_terminal(), terminal);
    }

    #[test]
    fn test_happy_path_transitions() {
        assert!(DepositStatus::Held.can_transition_to(DepositStatus::PendingReturn));
        assert!(DepositStatus::PendingReturn.can_transition_to(DepositStatus::Processing));
        assert!(DepositStatus::Processing.can_transition_to(DepositStatus::Returned));
        assert!(DepositStatus::Processing.can_transition_to(DepositStatus::PartialRefund));
        assert!(DepositStatus::Processing.can_transition_to(DepositStatus::AppliedToDamages));
        assert!(DepositStatus::PendingReturn.can_transition_to(DepositStatus::Forfeited));
    }

    #[test]
    fn test_held_can_be_forfeited_directly() {
        assert!(DepositStatus::Held.can_transition_to(DepositStatus::Forfeited));
        assert!(!DepositStatus::Held.can_transition_to(DepositStatus::Returned));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for terminal in [
            DepositStatus::Returned,
            DepositStatus::PartialRefund,
            DepositStatus::Forfeited,
            DepositStatus::AppliedToDamages,
        ] {
            assert!(!terminal.can_transition_to(DepositStatus::Held));
            assert!(!terminal.can_transition_to(DepositStatus::PendingReturn));
            assert!(!terminal.can_transition_to(DepositStatus::Processing));
            assert!(!terminal.can_transition_to(DepositStatus::Returned));
        }
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!DepositStatus::PendingReturn.can_transition_to(DepositStatus::Held));
        assert!(!DepositStatus::Processing.can_transition_to(DepositStatus::PendingReturn));
    }
}
