//! The static rule table and derived lookups.
//!
//! Rule values are provisioned at build time. If regulations change they
//! are versioned by effective date outside this engine; the table here is
//! the currently-effective snapshot.

use rust_decimal::Decimal;

use super::types::{ComplianceRule, DepositCap, Jurisdiction, LateFeeFormula};

const fn pct(hundredths: u32) -> Decimal {
    // e.g. pct(5) == 0.05
    Decimal::from_parts(hundredths, 0, 0, false, 2)
}

static NC: ComplianceRule = ComplianceRule {
    jurisdiction: Jurisdiction::Nc,
    max_deposit_months: Some(Decimal::TWO),
    refund_deadline_days: 30,
    interest_annual_rate: None,
    late_fee: LateFeeFormula::percentage(pct(5)),
    grace_period_days: 5,
};

static NY: ComplianceRule = ComplianceRule {
    jurisdiction: Jurisdiction::Ny,
    max_deposit_months: Some(Decimal::ONE),
    refund_deadline_days: 14,
    interest_annual_rate: Some(pct(1)),
    late_fee: LateFeeFormula::lesser_of(pct(5), Decimal::from_parts(50, 0, 0, false, 0)),
    grace_period_days: 5,
};

static CA: ComplianceRule = ComplianceRule {
    jurisdiction: Jurisdiction::Ca,
    max_deposit_months: Some(Decimal::TWO),
    refund_deadline_days: 21,
    interest_annual_rate: None,
    late_fee: LateFeeFormula::lease_specified(),
    grace_period_days: 3,
};

static TX: ComplianceRule = ComplianceRule {
    jurisdiction: Jurisdiction::Tx,
    max_deposit_months: None,
    refund_deadline_days: 30,
    interest_annual_rate: None,
    late_fee: LateFeeFormula::lease_specified(),
    grace_period_days: 2,
};

static FL: ComplianceRule = ComplianceRule {
    jurisdiction: Jurisdiction::Fl,
    max_deposit_months: None,
    refund_deadline_days: 15,
    interest_annual_rate: None,
    late_fee: LateFeeFormula::percentage(pct(5)),
    grace_period_days: 5,
};

static MD: ComplianceRule = ComplianceRule {
    jurisdiction: Jurisdiction::Md,
    max_deposit_months: Some(Decimal::TWO),
    refund_deadline_days: 45,
    interest_annual_rate: Some(Decimal::from_parts(15, 0, 0, false, 3)), // 1.5%
    late_fee: LateFeeFormula::percentage(pct(5)),
    grace_period_days: 5,
};

/// Looks up the rule record for a jurisdiction.
///
/// Total by construction: the match over the closed enum forces a record
/// per variant at compile time. Unknown codes fail earlier, at string
/// parsing.
#[must_use]
pub const fn rules_for(jurisdiction: Jurisdiction) -> &'static ComplianceRule {
    match jurisdiction {
        Jurisdiction::Nc => &NC,
        Jurisdiction::Ny => &NY,
        Jurisdiction::Ca => &CA,
        Jurisdiction::Tx => &TX,
        Jurisdiction::Fl => &FL,
        Jurisdiction::Md => &MD,
    }
}

/// Computes the maximum allowed deposit for a jurisdiction and rent.
#[must_use]
pub fn max_deposit(jurisdiction: Jurisdiction, monthly_rent: Decimal) -> DepositCap {
    match rules_for(jurisdiction).max_deposit_months {
        Some(months) => DepositCap::Limited(monthly_rent * months),
        None => DepositCap::Unlimited,
    }
}
