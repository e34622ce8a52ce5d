//! The balance synchronizer.

use std::sync::Arc;

use dashmap::DashMap;
use propledger_shared::types::PartyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::journal::JournalEngine;

/// A party's projected balance.
///
/// Positive means the party owes (receivable); negative means a credit in
/// their favor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyBalance {
    /// The party.
    pub party: PartyId,
    /// Net balance over party-tracked accounts.
    pub balance: Decimal,
    /// Number of posted lines that contributed.
    pub line_count: usize,
}

/// Maintains cached per-party balances derived from the journal.
///
/// The cache is a projection, not a second ledger: `derive` recomputes
/// from posted lines at any time, and the consistency validator compares
/// the two to catch drift.
pub struct BalanceSynchronizer {
    journal: Arc<JournalEngine>,
    balances: DashMap<PartyId, PartyBalance>,
}

impl BalanceSynchronizer {
    /// Creates a synchronizer over the given journal.
    #[must_use]
    pub fn new(journal: Arc<JournalEngine>) -> Self {
        Self {
            journal,
            balances: DashMap::new(),
        }
    }

    /// Derives the party's balance directly from posted journal lines.
    ///
    /// Only lines on accounts flagged `tracks_party_balance` participate;
    /// revenue and trust lines tagged with the party do not move their
    /// receivable. Debits increase the balance, credits decrease it.
    #[must_use]
    pub fn derive(&self, party: PartyId) -> PartyBalance {
        let chart = self.journal.chart();
        let mut balance = Decimal::ZERO;
        let mut line_count = 0_usize;
        for line in self.journal.posted_lines_for_party(party) {
            let tracked = chart
                .get(&line.account)
                .is_some_and(|account| account.tracks_party_balance);
            if tracked {
                balance += line.signed_amount();
                line_count += 1;
            }
        }
        PartyBalance {
            party,
            balance,
            line_count,
        }
    }

    /// Recomputes the party's balance and refreshes the cache.
    pub fn recompute(&self, party: PartyId) -> PartyBalance {
        let derived = self.derive(party);
        self.balances.insert(party, derived);
        tracing::debug!(party = %party, balance = %derived.balance, "recomputed party balance");
        derived
    }

    /// Returns the cached balance (zero if the party has no activity).
    #[must_use]
    pub fn balance_of(&self, party: PartyId) -> Decimal {
        self.balances
            .get(&party)
            .map_or(Decimal::ZERO, |entry| entry.value().balance)
    }

    /// Returns the cached balance, deriving and caching it on a miss.
    pub fn balance_or_recompute(&self, party: PartyId) -> Decimal {
        if let Some(entry) = self.balances.get(&party) {
            return entry.value().balance;
        }
        self.recompute(party).balance
    }

    /// Cached minus derived; nonzero means the projection has drifted.
    #[must_use]
    pub fn drift(&self, party: PartyId) -> Decimal {
        self.balance_of(party) - self.derive(party).balance
    }

    /// All parties with a cached balance.
    #[must_use]
    pub fn cached_parties(&self) -> Vec<PartyId> {
        self.balances.iter().map(|entry| *entry.key()).collect()
    }

    /// Snapshot of every cached balance, in arbitrary order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PartyBalance> {
        self.balances
            .iter()
            .map(|entry| *entry.value())
            .collect()
    }
}
