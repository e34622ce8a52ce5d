//! Compliance rule domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ComplianceError;

/// Jurisdictions (US states) supported by the engine.
///
/// A closed set: adding a state means adding a variant and a rule record,
/// and the compiler enforces exhaustiveness everywhere rules are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    /// North Carolina
    Nc,
    /// New York
    Ny,
    /// California
    Ca,
    /// Texas
    Tx,
    /// Florida
    Fl,
    /// Maryland
    Md,
}

impl Jurisdiction {
    /// All supported jurisdictions, in declaration order.
    pub const ALL: [Self; 6] = [Self::Nc, Self::Ny, Self::Ca, Self::Tx, Self::Fl, Self::Md];
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::Nc => "NC",
            Self::Ny => "NY",
            Self::Ca => "CA",
            Self::Tx => "TX",
            Self::Fl => "FL",
            Self::Md => "MD",
        };
        write!(f, "{code}")
    }
}

impl std::str::FromStr for Jurisdiction {
    type Err = ComplianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NC" => Ok(Self::Nc),
            "NY" => Ok(Self::Ny),
            "CA" => Ok(Self::Ca),
            "TX" => Ok(Self::Tx),
            "FL" => Ok(Self::Fl),
            "MD" => Ok(Self::Md),
            _ => Err(ComplianceError::UnknownJurisdiction(s.to_string())),
        }
    }
}

/// Statutory late fee formula descriptor.
///
/// Covers the observed variants:
/// - percentage with a flat ceiling and "whichever is less"
/// - plain percentage of monthly rent
/// - no statutory formula (lease-specified; statutory fee is zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LateFeeFormula {
    /// Percentage of monthly rent (e.g. 0.05 for 5%).
    pub percent_of_rent: Option<Decimal>,
    /// Flat dollar ceiling on the fee.
    pub flat_ceiling: Option<Decimal>,
    /// When both a percentage and a ceiling exist, charge the lesser.
    pub whichever_is_less: bool,
}

impl LateFeeFormula {
    /// A plain percentage-of-rent formula.
    #[must_use]
    pub const fn percentage(pct: Decimal) -> Self {
        Self {
            percent_of_rent: Some(pct),
            flat_ceiling: None,
            whichever_is_less: false,
        }
    }

    /// The lesser of a percentage of rent and a flat ceiling.
    #[must_use]
    pub const fn lesser_of(pct: Decimal, ceiling: Decimal) -> Self {
        Self {
            percent_of_rent: Some(pct),
            flat_ceiling: Some(ceiling),
            whichever_is_less: true,
        }
    }

    /// No statutory formula; fee terms come from the lease.
    #[must_use]
    pub const fn lease_specified() -> Self {
        Self {
            percent_of_rent: None,
            flat_ceiling: None,
            whichever_is_less: false,
        }
    }
}

/// The statutory rule record for one jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRule {
    /// The jurisdiction this record applies to.
    pub jurisdiction: Jurisdiction,
    /// Maximum deposit as a multiple of monthly rent; `None` = unlimited.
    pub max_deposit_months: Option<Decimal>,
    /// Days after move-out within which the disposition must complete.
    pub refund_deadline_days: i64,
    /// Annual interest rate owed on held deposits; `None` = not required.
    pub interest_annual_rate: Option<Decimal>,
    /// Statutory late fee formula.
    pub late_fee: LateFeeFormula,
    /// Days after the due date during which no late fee accrues.
    pub grace_period_days: i64,
}

impl ComplianceRule {
    /// Returns true if this jurisdiction requires interest on deposits.
    #[must_use]
    pub const fn requires_interest(&self) -> bool {
        self.interest_annual_rate.is_some()
    }
}

/// Result of a deposit cap computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositCap {
    /// Deposits are capped at this amount.
    Limited(Decimal),
    /// The jurisdiction imposes no cap.
    Unlimited,
}

impl DepositCap {
    /// Returns true if `amount` is within the cap.
    #[must_use]
    pub fn allows(&self, amount: Decimal) -> bool {
        match self {
            Self::Limited(cap) => amount <= *cap,
            Self::Unlimited => true,
        }
    }
}
