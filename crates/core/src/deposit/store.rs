//! In-memory deposit store.

use dashmap::DashMap;
use propledger_shared::types::DepositId;

use super::error::DepositError;
use super::types::{DepositStatus, SecurityDeposit};

/// Concurrent store of security deposits, keyed by ID.
///
/// Mutations go through `update`, which holds the map entry for the
/// duration of the closure so status checks and writes are atomic per
/// deposit. Cross-deposit invariants are the engine's job.
#[derive(Debug, Default)]
pub struct DepositStore {
    deposits: DashMap<DepositId, SecurityDeposit>,
}

impl DepositStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            deposits: DashMap::new(),
        }
    }

    /// Records a new deposit.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDisposed` if a deposit with this ID exists; IDs are
    /// generated, so a collision means a caller bug.
    pub fn insert(&self, deposit: SecurityDeposit) -> Result<(), DepositError> {
        let id = deposit.id;
        if self.deposits.contains_key(&id) {
            return Err(DepositError::AlreadyDisposed(id));
        }
        self.deposits.insert(id, deposit);
        Ok(())
    }

    /// Returns a snapshot of the deposit.
    ///
    /// # Errors
    ///
    /// Returns `DepositNotFound`.
    pub fn get(&self, id: DepositId) -> Result<SecurityDeposit, DepositError> {
        self.deposits
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(DepositError::DepositNotFound(id))
    }

    /// Applies a mutation to the deposit under its map entry.
    ///
    /// The closure sees the live record; if it errors, any partial changes
    /// it made are still visible, so closures must validate before
    /// mutating.
    ///
    /// # Errors
    ///
    /// Returns `DepositNotFound`, or whatever the closure returns.
    pub fn update<T>(
        &self,
        id: DepositId,
        mutate: impl FnOnce(&mut SecurityDeposit) -> Result<T, DepositError>,
    ) -> Result<T, DepositError> {
        let mut entry = self
            .deposits
            .get_mut(&id)
            .ok_or(DepositError::DepositNotFound(id))?;
        mutate(entry.value_mut())
    }

    /// Transitions the deposit's status, enforcing the state machine.
    ///
    /// # Errors
    ///
    /// Returns `DepositNotFound` or `InvalidTransition`.
    pub fn transition(&self, id: DepositId, to: DepositStatus) -> Result<(), DepositError> {
        self.update(id, |deposit| {
            if !deposit.status.can_transition_to(to) {
                return Err(DepositError::InvalidTransition {
                    from: deposit.status,
                    to,
                });
            }
            tracing::debug!(deposit = %id, from = %deposit.status, to = %to, "deposit transition");
            deposit.status = to;
            Ok(())
        })
    }

    /// Snapshot of every deposit, in arbitrary order.
    #[must_use]
    pub fn all(&self) -> Vec<SecurityDeposit> {
        self.deposits
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of deposits recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deposits.len()
    }

    /// Returns true if the store has no deposits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::Jurisdiction;
    use chrono::NaiveDate;
    use propledger_shared::types::{LeaseId, PartyId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sample() -> SecurityDeposit {
        let collected = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        SecurityDeposit {
            id: DepositId::new(),
            party: PartyId::new(),
            lease: LeaseId::new(),
            jurisdiction: Jurisdiction::Nc,
            principal: dec!(2000),
            interest_accrued: Decimal::ZERO,
            monthly_rent_at_collection: dec!(1500),
            collected_on: collected,
            accrued_through: collected,
            status: DepositStatus::Held,
            move_out_date: None,
            refund_deadline: None,
            inspection_notes: None,
            deductions: Vec::new(),
            disposition: None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let store = DepositStore::new();
        let deposit = sample();
        let id = deposit.id;

        store.insert(deposit).unwrap();
        assert_eq!(store.get(id).unwrap().principal, dec!(2000));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_missing() {
        let store = DepositStore::new();
        assert!(matches!(
            store.get(DepositId::new()),
            Err(DepositError::DepositNotFound(_))
        ));
    }

    #[test]
    fn test_transition_enforces_state_machine() {
        let store = DepositStore::new();
        let deposit = sample();
        let id = deposit.id;
        store.insert(deposit).unwrap();

        store.transition(id, DepositStatus::PendingReturn).unwrap();
        assert_eq!(store.get(id).unwrap().status, DepositStatus::PendingReturn);

        let err = store.transition(id, DepositStatus::Held).unwrap_err();
        assert!(matches!(err, DepositError::InvalidTransition { .. }));
    }

    #[test]
    fn test_update_mutates_record() {
        let store = DepositStore::new();
        let deposit = sample();
        let id = deposit.id;
        store.insert(deposit).unwrap();

        store
            .update(id, |deposit| {
                deposit.interest_accrued = dec!(12.50);
                Ok(())
            })
            .unwrap();
        assert_eq!(store.get(id).unwrap().interest_accrued, dec!(12.50));
    }
}
