//! Balanced-posting validation.

use propledger_shared::types::LEDGER_TOLERANCE;
use rust_decimal::Decimal;

use super::error::JournalError;
use super::types::{LineInput, Side};
use crate::accounts::ChartOfAccounts;

/// Validates a set of posting lines against the chart of accounts.
///
/// Checks, in order:
/// 1. At least one line, then at least two
/// 2. Each amount positive and non-zero
/// 3. Each account registered and active
/// 4. Both debit and credit sides present
/// 5. |sum(debit) - sum(credit)| within the ledger tolerance
///
/// # Errors
///
/// Returns the first `JournalError` encountered; no state is changed.
pub fn validate_lines(lines: &[LineInput], chart: &ChartOfAccounts) -> Result<(), JournalError> {
    if lines.is_empty() {
        return Err(JournalError::NoLines);
    }
    if lines.len() < 2 {
        return Err(JournalError::InsufficientLines);
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount == Decimal::ZERO {
            return Err(JournalError::ZeroAmount);
        }
        if line.amount < Decimal::ZERO {
            return Err(JournalError::NegativeAmount);
        }

        chart.require_active(&line.account)?;

        match line.side {
            Side::Debit => {
                debits += line.amount;
                has_debit = true;
            }
            Side::Credit => {
                credits += line.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(JournalError::SingleSided);
    }

    if (debits - credits).abs() > LEDGER_TOLERANCE {
        return Err(JournalError::ImbalancedEntry { debits, credits });
    }

    Ok(())
}
