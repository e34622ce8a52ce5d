//! Trust pool balances.

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::compliance::Jurisdiction;

/// A segregated trust pool for one jurisdiction.
///
/// Extendable to one pool per bank account; per-jurisdiction is the
/// statutory minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustAccount {
    /// The jurisdiction this pool serves.
    pub jurisdiction: Jurisdiction,
    /// Current pool balance (held deposit principal).
    pub balance: Decimal,
}

/// The set of trust pools, keyed by jurisdiction.
///
/// The pool tracks principal only: interest accrual posts to the ledger
/// (trust cash / interest payable) without adjusting the pool, and the
/// payable is settled at disposition.
#[derive(Debug, Default)]
pub struct TrustPools {
    pools: DashMap<Jurisdiction, Decimal>,
}

impl TrustPools {
    /// Creates an empty pool set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pools: DashMap::new(),
        }
    }

    /// Returns the pool balance for a jurisdiction (zero if untouched).
    #[must_use]
    pub fn balance(&self, jurisdiction: Jurisdiction) -> Decimal {
        self.pools
            .get(&jurisdiction)
            .map_or(Decimal::ZERO, |balance| *balance.value())
    }

    /// Records a deposit collection into the pool.
    pub fn deposit_collected(&self, jurisdiction: Jurisdiction, amount: Decimal) {
        *self.pools.entry(jurisdiction).or_insert(Decimal::ZERO) += amount;
    }

    /// Releases a deposit's full principal from the pool.
    ///
    /// The principal leaves the pool at disposition regardless of how it
    /// was split between refund and revenue.
    pub fn deposit_released(&self, jurisdiction: Jurisdiction, principal: Decimal) {
        *self.pools.entry(jurisdiction).or_insert(Decimal::ZERO) -= principal;
    }

    /// Snapshot of all pools with activity, in arbitrary order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<TrustAccount> {
        self.pools
            .iter()
            .map(|entry| TrustAccount {
                jurisdiction: *entry.key(),
                balance: *entry.value(),
            })
            .collect()
    }
}
