//! The chart-of-accounts registry.

use std::collections::BTreeMap;

use super::error::AccountError;
use super::types::{Account, AccountCode, AccountType};

/// Well-known account codes used by the engine's postings.
pub mod codes {
    /// Operating cash (asset).
    pub const OPERATING_CASH: &str = "1000";
    /// Trust cash - segregated deposit funds (asset).
    pub const TRUST_CASH: &str = "1010";
    /// Accounts receivable (asset, party-tracked).
    pub const ACCOUNTS_RECEIVABLE: &str = "1100";
    /// Security deposit liability.
    pub const DEPOSIT_LIABILITY: &str = "2100";
    /// Accrued deposit interest payable.
    pub const INTEREST_PAYABLE: &str = "2110";
    /// Owner equity.
    pub const OWNER_EQUITY: &str = "3000";
    /// Rent income (revenue).
    pub const RENT_INCOME: &str = "4000";
    /// Late fee income (revenue).
    pub const LATE_FEE_INCOME: &str = "4100";
    /// Damage recovery / forfeiture income (revenue).
    pub const DAMAGE_RECOVERY_INCOME: &str = "4200";
    /// Maintenance expense.
    pub const MAINTENANCE_EXPENSE: &str = "5000";
}

/// Registry of accounts, keyed by code.
///
/// Provisioned at setup time; the only mutation after registration is
/// deactivation, so accounts referenced by posted lines stay stable.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    accounts: BTreeMap<AccountCode, Account>,
}

impl ChartOfAccounts {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
        }
    }

    /// Provisions the fixed property-management chart.
    #[must_use]
    pub fn standard_chart() -> Self {
        let mut chart = Self::new();
        let standard = [
            (codes::OPERATING_CASH, "Operating Cash", AccountType::Asset, false),
            (codes::TRUST_CASH, "Trust Cash", AccountType::Asset, false),
            (
                codes::ACCOUNTS_RECEIVABLE,
                "Accounts Receivable",
                AccountType::Asset,
                true,
            ),
            (
                codes::DEPOSIT_LIABILITY,
                "Security Deposit Liability",
                AccountType::Liability,
                false,
            ),
            (
                codes::INTEREST_PAYABLE,
                "Deposit Interest Payable",
                AccountType::Liability,
                false,
            ),
            (codes::OWNER_EQUITY, "Owner Equity", AccountType::Equity, false),
            (codes::RENT_INCOME, "Rent Income", AccountType::Revenue, false),
            (
                codes::LATE_FEE_INCOME,
                "Late Fee Income",
                AccountType::Revenue,
                false,
            ),
            (
                codes::DAMAGE_RECOVERY_INCOME,
                "Damage Recovery Income",
                AccountType::Revenue,
                false,
            ),
            (
                codes::MAINTENANCE_EXPENSE,
                "Maintenance Expense",
                AccountType::Expense,
                false,
            ),
        ];

        for (code, name, account_type, tracks_party_balance) in standard {
            // Codes in the standard chart are unique by construction.
            let _ = chart.register(Account {
                code: AccountCode::from(code),
                name: name.to_string(),
                account_type,
                is_active: true,
                tracks_party_balance,
            });
        }
        chart
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateAccount` if the code is already registered.
    pub fn register(&mut self, account: Account) -> Result<(), AccountError> {
        if self.accounts.contains_key(&account.code) {
            return Err(AccountError::DuplicateAccount(account.code));
        }
        self.accounts.insert(account.code.clone(), account);
        Ok(())
    }

    /// Looks up an account by code.
    #[must_use]
    pub fn get(&self, code: &AccountCode) -> Option<&Account> {
        self.accounts.get(code)
    }

    /// Looks up an account, requiring it to exist and be active.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` or `AccountInactive`.
    pub fn require_active(&self, code: &AccountCode) -> Result<&Account, AccountError> {
        let account = self
            .accounts
            .get(code)
            .ok_or_else(|| AccountError::UnknownAccount(code.clone()))?;
        if !account.is_active {
            return Err(AccountError::AccountInactive(code.clone()));
        }
        Ok(account)
    }

    /// Deactivates an account so it rejects new postings.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` if the code is not registered.
    pub fn deactivate(&mut self, code: &AccountCode) -> Result<(), AccountError> {
        let account = self
            .accounts
            .get_mut(code)
            .ok_or_else(|| AccountError::UnknownAccount(code.clone()))?;
        account.is_active = false;
        Ok(())
    }

    /// Iterates over all registered accounts in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }
}

impl Default for ChartOfAccounts {
    fn default() -> Self {
        Self::standard_chart()
    }
}
