//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal`; the engine's rounding policy
//! (round-half-up to cents) and tolerance constants live here so posting
//! validation and audit validation share a single definition.

use rust_decimal::{Decimal, RoundingStrategy};

/// Maximum allowed |debits - credits| for a posted journal entry.
///
/// Applied at post time and re-checked by the consistency validator.
pub const LEDGER_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 4); // 0.0001

/// Tolerance for derived-balance reconciliation (trust pools, party
/// balances). Coarser than the ledger tolerance because projections are
/// rounded to cents.
pub const RECONCILIATION_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01

/// Rounds a monetary amount to cents using round-half-up.
///
/// This is the single rounding policy for the engine. Interest accrual and
/// percentage-based fees round through this function before posting.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as a US dollar string with thousands separators,
/// e.g. `$3,000.00`. Used in compliance error messages so rejections cite
/// the computed limit.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = round_money(amount);
    let negative = rounded.is_sign_negative();
    let abs = rounded.abs();

    let as_string = format!("{abs:.2}");
    let (whole, cents) = as_string
        .split_once('.')
        .unwrap_or((as_string.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}.{cents}")
    } else {
        format!("${grouped}.{cents}")
    }
}
