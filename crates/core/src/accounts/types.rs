//! Account domain types.

use serde::{Deserialize, Serialize};

/// Account classification in the five-category chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (cash, receivables).
    Asset,
    /// Liability account (deposits held, interest payable).
    Liability,
    /// Equity account.
    Equity,
    /// Revenue account (rent, fees, recoveries).
    Revenue,
    /// Expense account.
    Expense,
}

impl AccountType {
    /// Returns the side that increases an account of this type.
    ///
    /// Asset/Expense accounts are debit-normal; Liability/Equity/Revenue
    /// accounts are credit-normal.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }
}

/// The normal balance side of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal (Asset, Expense).
    Debit,
    /// Credit-normal (Liability, Equity, Revenue).
    Credit,
}

/// Account code within the chart (e.g. "1010" for trust cash).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountCode(pub String);

impl AccountCode {
    /// Creates an account code from a string-like value.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for AccountCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

/// An account in the chart.
///
/// Immutable once referenced by a posted line: the registry exposes no
/// mutation besides `deactivate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique account code.
    pub code: AccountCode,
    /// Display name.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// Whether lines on this account feed party-balance derivation
    /// (receivable/payable-type accounts only).
    pub tracks_party_balance: bool,
}

impl Account {
    /// Returns the normal balance side for this account.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }
}
