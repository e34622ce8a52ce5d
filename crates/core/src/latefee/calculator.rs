//! Late fee assessment.

use chrono::NaiveDate;
use propledger_shared::types::{format_usd, round_money, LeaseId, PartyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::compliance::{rules_for, Jurisdiction};

/// Audit record of a late fee actually posted to the ledger.
///
/// Retains the rent used at assessment time so the statutory maximum can
/// be re-derived later even if the lease's rent changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LateFeeRecord {
    /// The lease the fee was charged under.
    pub lease: LeaseId,
    /// The tenant charged.
    pub party: PartyId,
    /// Jurisdiction whose formula applied.
    pub jurisdiction: Jurisdiction,
    /// Monthly rent at assessment time.
    pub monthly_rent: Decimal,
    /// The fee amount posted.
    pub amount: Decimal,
    /// Date of assessment.
    pub assessed_on: NaiveDate,
}

/// Result of a late fee assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LateFeeAssessment {
    /// The fee amount (zero within the grace period).
    pub amount: Decimal,
    /// Days between the due date and the assessment date (never negative).
    pub days_late: i64,
    /// True if the assessment fell within the grace period.
    pub within_grace: bool,
    /// Human-readable description of the formula applied.
    pub formula: String,
}

/// Assesses a late fee for the given rent and dates.
///
/// `days_late = max(0, assessment_date - due_date)`. Within the
/// jurisdiction's grace period the fee is zero. Otherwise the statutory
/// formula applies: the lesser of a percentage and a flat ceiling where
/// "whichever is less" is mandated, a plain percentage, or zero where the
/// statute leaves fees to the lease.
#[must_use]
pub fn assess(
    rent: Decimal,
    due_date: NaiveDate,
    assessment_date: NaiveDate,
    jurisdiction: Jurisdiction,
) -> LateFeeAssessment {
    let rule = rules_for(jurisdiction);
    let days_late = (assessment_date - due_date).num_days().max(0);

    if days_late <= rule.grace_period_days {
        return LateFeeAssessment {
            amount: Decimal::ZERO,
            days_late,
            within_grace: true,
            formula: format!(
                "within {}-day grace period ({days_late} days late)",
                rule.grace_period_days
            ),
        };
    }

    let formula = rule.late_fee;
    let (amount, description) = match (formula.percent_of_rent, formula.flat_ceiling) {
        (Some(pct), Some(ceiling)) if formula.whichever_is_less => {
            let percentage_fee = round_money(rent * pct);
            let amount = percentage_fee.min(ceiling);
            (
                amount,
                format!(
                    "lesser of {} of monthly rent ({}) and {}",
                    display_percent(pct),
                    format_usd(percentage_fee),
                    format_usd(ceiling)
                ),
            )
        }
        (Some(pct), _) => {
            let amount = round_money(rent * pct);
            (
                amount,
                format!(
                    "{} of monthly rent ({})",
                    display_percent(pct),
                    format_usd(amount)
                ),
            )
        }
        (None, _) => (
            Decimal::ZERO,
            format!("no statutory late fee in {jurisdiction}; lease terms apply"),
        ),
    };

    LateFeeAssessment {
        amount,
        days_late,
        within_grace: false,
        formula: description,
    }
}

/// The largest fee the statute permits for this rent, ignoring grace.
///
/// Returns `None` where the statute leaves fees to the lease (no cap to
/// enforce).
#[must_use]
pub fn statutory_maximum(rent: Decimal, jurisdiction: Jurisdiction) -> Option<Decimal> {
    let formula = rules_for(jurisdiction).late_fee;
    match (formula.percent_of_rent, formula.flat_ceiling) {
        (Some(pct), Some(ceiling)) if formula.whichever_is_less => {
            Some(round_money(rent * pct).min(ceiling))
        }
        (Some(pct), _) => Some(round_money(rent * pct)),
        (None, _) => None,
    }
}

fn display_percent(pct: Decimal) -> String {
    format!("{}%", (pct * Decimal::ONE_HUNDRED).normalize())
}
