//! Pure lifecycle planning for deposit dispositions.
//!
//! These functions compute what a transition would do - outcome, refund,
//! liability split - without touching any state. The engine facade applies
//! the plan: it posts the journal entries, releases the trust pool, and
//! commits the new status in one guarded operation.

use chrono::NaiveDate;
use propledger_shared::types::format_usd;
use rust_decimal::Decimal;

use super::error::DepositError;
use super::types::{Deduction, DepositStatus, Disposition, SecurityDeposit};
use crate::compliance::rules_for;

/// One deduction's share of the liability split.
///
/// Deductions consume principal first, then accrued interest, so each
/// posting debits the right liability account(s).
#[derive(Debug, Clone)]
pub struct DeductionPosting {
    /// The deduction being settled.
    pub deduction: Deduction,
    /// Portion drawn from principal (deposit liability).
    pub from_principal: Decimal,
    /// Portion drawn from accrued interest (interest payable).
    pub from_interest: Decimal,
}

/// A computed disposition, ready to be applied.
#[derive(Debug, Clone)]
pub struct DispositionPlan {
    /// Terminal outcome the deposit will reach.
    pub outcome: DepositStatus,
    /// Total refund to the tenant (principal + interest - deductions).
    pub refund: Decimal,
    /// Refund portion drawn from principal.
    pub refund_from_principal: Decimal,
    /// Refund portion drawn from accrued interest.
    pub refund_from_interest: Decimal,
    /// Per-deduction liability splits.
    pub deduction_postings: Vec<DeductionPosting>,
    /// The immutable disposition record to attach to the deposit.
    pub disposition: Disposition,
}

/// Plans a disposition from the deposit's accumulated deductions.
///
/// Outcome is derived from the deduction total: zero deductions mean
/// `Returned`, full consumption means `AppliedToDamages`, anything in
/// between means `PartialRefund`. `Forfeited` is never inferred here; it
/// requires the explicit `plan_forfeiture` path.
///
/// # Errors
///
/// Returns `AlreadyDisposed` for terminal deposits and
/// `InvalidTransition` when the deposit has not entered the return flow.
pub fn plan_disposition(
    deposit: &SecurityDeposit,
    disposition_date: NaiveDate,
    forwarding_address: Option<String>,
) -> Result<DispositionPlan, DepositError> {
    if deposit.status.is_terminal() {
        return Err(DepositError::AlreadyDisposed(deposit.id));
    }
    if !matches!(
        deposit.status,
        DepositStatus::PendingReturn | DepositStatus::Processing
    ) {
        return Err(DepositError::InvalidTransition {
            from: deposit.status,
            to: DepositStatus::Processing,
        });
    }

    // begin_return always records the move-out date before this state is
    // reachable.
    let move_out_date = deposit.move_out_date.unwrap_or(disposition_date);

    let total_deductions = deposit.total_deductions();
    let refund = deposit.principal + deposit.interest_accrued - total_deductions;

    let outcome = if deposit.deductions.is_empty() {
        DepositStatus::Returned
    } else if refund.is_zero() {
        DepositStatus::AppliedToDamages
    } else {
        DepositStatus::PartialRefund
    };

    // Deductions consume principal first, then interest.
    let mut principal_left = deposit.principal;
    let mut interest_left = deposit.interest_accrued;
    let deduction_postings = deposit
        .deductions
        .iter()
        .map(|deduction| {
            let from_principal = deduction.amount.min(principal_left);
            let from_interest = deduction.amount - from_principal;
            principal_left -= from_principal;
            interest_left -= from_interest;
            DeductionPosting {
                deduction: deduction.clone(),
                from_principal,
                from_interest,
            }
        })
        .collect();

    let rule = rules_for(deposit.jurisdiction);
    let is_compliant =
        (disposition_date - move_out_date).num_days() <= rule.refund_deadline_days;

    Ok(DispositionPlan {
        outcome,
        refund,
        refund_from_principal: principal_left,
        refund_from_interest: interest_left,
        deduction_postings,
        disposition: Disposition {
            move_out_date,
            disposition_date,
            total_deductions,
            refund_amount: refund,
            is_compliant,
            forwarding_address,
        },
    })
}

/// Plans an explicit forfeiture: zero refund, no itemized deductions.
///
/// Reserved for cases like tenant abandonment where the landlord keeps
/// the whole deposit without a damage statement.
///
/// # Errors
///
/// Returns `AlreadyDisposed` for terminal deposits and
/// `ForfeitRequiresNoDeductions` when deductions were itemized.
pub fn plan_forfeiture(
    deposit: &SecurityDeposit,
    disposition_date: NaiveDate,
) -> Result<DispositionPlan, DepositError> {
    if deposit.status.is_terminal() {
        return Err(DepositError::AlreadyDisposed(deposit.id));
    }
    if !deposit.deductions.is_empty() {
        return Err(DepositError::ForfeitRequiresNoDeductions(deposit.id));
    }

    let move_out_date = deposit.move_out_date.unwrap_or(disposition_date);
    let rule = rules_for(deposit.jurisdiction);
    let is_compliant =
        (disposition_date - move_out_date).num_days() <= rule.refund_deadline_days;

    Ok(DispositionPlan {
        outcome: DepositStatus::Forfeited,
        refund: Decimal::ZERO,
        refund_from_principal: Decimal::ZERO,
        refund_from_interest: Decimal::ZERO,
        deduction_postings: Vec::new(),
        disposition: Disposition {
            move_out_date,
            disposition_date,
            total_deductions: Decimal::ZERO,
            refund_amount: Decimal::ZERO,
            is_compliant,
            forwarding_address: None,
        },
    })
}

/// Validates that a deduction can be added to the deposit.
///
/// Enforces the "never exceeds remaining balance" invariant incrementally
/// so partial validation happens at add time, not only at disposition.
///
/// # Errors
///
/// Returns `InvalidDeductionAmount`, `AlreadyDisposed`, or
/// `DeductionExceedsDeposit` (citing the remaining balance).
pub fn validate_deduction(
    deposit: &SecurityDeposit,
    amount: Decimal,
) -> Result<(), DepositError> {
    if amount <= Decimal::ZERO {
        return Err(DepositError::InvalidDeductionAmount);
    }
    if deposit.status.is_terminal() {
        return Err(DepositError::AlreadyDisposed(deposit.id));
    }

    let remaining = deposit.remaining_balance();
    if amount > remaining {
        return Err(DepositError::DeductionExceedsDeposit {
            remaining: format_usd(remaining),
            attempted: format_usd(amount),
        });
    }
    Ok(())
}
