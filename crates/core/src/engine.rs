//! The orchestrating facade.
//!
//! `LedgerEngine` owns the journal, the trust pools, the deposit store,
//! and the balance projection, and exposes the business operations that
//! tie them together. Every mutation of a deposit or a party balance is
//! serialized through a per-entity lock table with bounded retry, so two
//! concurrent dispositions of the same deposit cannot interleave.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use dashmap::DashMap;
use propledger_shared::types::{format_usd, round_money, DeductionId, DepositId, JournalEntryId, LeaseId, PartyId};
use propledger_shared::EngineConfig;
use rust_decimal::Decimal;

use crate::accounts::registry::codes;
use crate::accounts::ChartOfAccounts;
use crate::balance::BalanceSynchronizer;
use crate::compliance::{max_deposit, rules_for, ComplianceRule, DepositCap, Jurisdiction};
use crate::deposit::types::{Deduction, DeductionCategory, DepositStatus, SecurityDeposit};
use crate::deposit::{plan_disposition, plan_forfeiture, validate_deduction, DepositError, DepositStore};
use crate::error::EngineError;
use crate::journal::{
    JournalEngine, JournalEntry, LineInput, PostingInput, Reference, ReferenceKind, Side,
};
use crate::latefee::{assess, LateFeeAssessment, LateFeeRecord};
use crate::trust::{TrustAccount, TrustPools};
use crate::validator::{ConsistencyValidator, ValidationReport};

const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// Result of a late fee charge: the assessment, and the entry posted when
/// the fee was nonzero.
#[derive(Debug, Clone)]
pub struct LateFeeCharge {
    /// The statutory assessment.
    pub assessment: LateFeeAssessment,
    /// The posted entry (`None` when the fee was zero).
    pub entry: Option<JournalEntry>,
}

/// Result of an interest accrual.
#[derive(Debug, Clone)]
pub struct InterestAccrual {
    /// Interest added this accrual (zero where not required).
    pub amount: Decimal,
    /// Days covered by this accrual.
    pub days: i64,
    /// The posted entry (`None` when nothing accrued).
    pub entry: Option<JournalEntryId>,
}

/// The engine facade.
pub struct LedgerEngine {
    config: EngineConfig,
    journal: Arc<JournalEngine>,
    pools: TrustPools,
    deposits: DepositStore,
    balances: BalanceSynchronizer,
    deposit_locks: DashMap<DepositId, Arc<Mutex<()>>>,
    party_locks: DashMap<PartyId, Arc<Mutex<()>>>,
    late_fees: RwLock<Vec<LateFeeRecord>>,
    // Inverted read/write roles: commit sections that touch both a trust
    // pool and a deposit record share the read side (they are already
    // serialized per deposit), while the audit takes the write side so it
    // only ever observes fully committed pool/status pairs.
    commits: RwLock<()>,
}

impl LedgerEngine {
    /// Creates an engine with the standard chart and the given config.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let journal = Arc::new(JournalEngine::new(Arc::new(
            ChartOfAccounts::standard_chart(),
        )));
        let balances = BalanceSynchronizer::new(Arc::clone(&journal));
        Self {
            config,
            journal,
            pools: TrustPools::new(),
            deposits: DepositStore::new(),
            balances,
            deposit_locks: DashMap::new(),
            party_locks: DashMap::new(),
            late_fees: RwLock::new(Vec::new()),
            commits: RwLock::new(()),
        }
    }

    /// Posts a rent charge against the tenant's receivable.
    ///
    /// # Errors
    ///
    /// Returns a journal validation error or `LockContended`.
    pub fn post_charge(
        &self,
        party: PartyId,
        lease: LeaseId,
        amount: Decimal,
        date: NaiveDate,
        idempotency_key: Option<String>,
    ) -> Result<JournalEntry, EngineError> {
        let lock = self.party_lock(party);
        let _guard = self.acquire(&lock, &party.to_string())?;

        let entry = self.journal.post(PostingInput {
            date,
            description: format!("Rent charge for lease {lease}"),
            reference: Reference::new(ReferenceKind::RentCharge, lease.to_string()),
            lines: vec![
                LineInput::new(codes::ACCOUNTS_RECEIVABLE, Side::Debit, amount).with_party(party),
                LineInput::new(codes::RENT_INCOME, Side::Credit, amount),
            ],
            idempotency_key,
        })?;
        self.balances.recompute(party);

        tracing::info!(party = %party, amount = %amount, "posted rent charge");
        Ok(entry)
    }

    /// Assesses and, when nonzero, posts a statutory late fee.
    ///
    /// Within the grace period or where the statute leaves fees to the
    /// lease, the assessment comes back with a zero amount and nothing is
    /// posted.
    ///
    /// # Errors
    ///
    /// Returns a journal validation error or `LockContended`.
    pub fn post_late_fee(
        &self,
        party: PartyId,
        lease: LeaseId,
        monthly_rent: Decimal,
        due_date: NaiveDate,
        assessment_date: NaiveDate,
        jurisdiction: Jurisdiction,
        idempotency_key: Option<String>,
    ) -> Result<LateFeeCharge, EngineError> {
        let assessment = assess(monthly_rent, due_date, assessment_date, jurisdiction);
        if assessment.amount.is_zero() {
            tracing::debug!(party = %party, formula = %assessment.formula, "no late fee due");
            return Ok(LateFeeCharge {
                assessment,
                entry: None,
            });
        }

        let lock = self.party_lock(party);
        let _guard = self.acquire(&lock, &party.to_string())?;

        let entry = self.journal.post(PostingInput {
            date: assessment_date,
            description: format!("Late fee: {}", assessment.formula),
            reference: Reference::new(ReferenceKind::LateFee, lease.to_string()),
            lines: vec![
                LineInput::new(codes::ACCOUNTS_RECEIVABLE, Side::Debit, assessment.amount)
                    .with_party(party),
                LineInput::new(codes::LATE_FEE_INCOME, Side::Credit, assessment.amount),
            ],
            idempotency_key,
        })?;
        self.write_late_fees().push(LateFeeRecord {
            lease,
            party,
            jurisdiction,
            monthly_rent,
            amount: assessment.amount,
            assessed_on: assessment_date,
        });
        self.balances.recompute(party);

        tracing::info!(party = %party, amount = %assessment.amount, "posted late fee");
        Ok(LateFeeCharge {
            assessment,
            entry: Some(entry),
        })
    }

    /// Collects a security deposit into the jurisdiction's trust pool.
    ///
    /// # Errors
    ///
    /// Returns `ComplianceLimitExceeded` when the amount exceeds the
    /// jurisdiction's cap, or a journal validation error.
    pub fn collect_deposit(
        &self,
        party: PartyId,
        lease: LeaseId,
        amount: Decimal,
        monthly_rent: Decimal,
        jurisdiction: Jurisdiction,
        collected_on: NaiveDate,
    ) -> Result<SecurityDeposit, EngineError> {
        if let DepositCap::Limited(limit) = max_deposit(jurisdiction, monthly_rent) {
            if amount > limit {
                // The rule carries months whenever the cap is limited.
                let months = rules_for(jurisdiction)
                    .max_deposit_months
                    .unwrap_or_default();
                return Err(DepositError::ComplianceLimitExceeded {
                    jurisdiction,
                    months,
                    cap: format_usd(limit),
                    attempted: format_usd(amount),
                }
                .into());
            }
        }

        let deposit = SecurityDeposit {
            id: DepositId::new(),
            party,
            lease,
            jurisdiction,
            principal: amount,
            interest_accrued: Decimal::ZERO,
            monthly_rent_at_collection: monthly_rent,
            collected_on,
            accrued_through: collected_on,
            status: DepositStatus::Held,
            move_out_date: None,
            refund_deadline: None,
            inspection_notes: None,
            deductions: Vec::new(),
            disposition: None,
        };

        self.journal.post(PostingInput {
            date: collected_on,
            description: format!("Security deposit collection for lease {lease}"),
            reference: Reference::new(ReferenceKind::DepositCollection, deposit.id.to_string()),
            lines: vec![
                LineInput::new(codes::TRUST_CASH, Side::Debit, amount).with_party(party),
                LineInput::new(codes::DEPOSIT_LIABILITY, Side::Credit, amount).with_party(party),
            ],
            idempotency_key: None,
        })?;
        {
            let _commit = self.begin_commit();
            self.pools.deposit_collected(jurisdiction, amount);
            self.deposits.insert(deposit.clone())?;
        }
        self.balances.recompute(party);

        tracing::info!(
            deposit = %deposit.id,
            jurisdiction = %jurisdiction,
            amount = %amount,
            "collected security deposit"
        );
        Ok(deposit)
    }

    /// Accrues interest on a held deposit through the given date.
    ///
    /// Simple (non-compounding) interest at the statutory annual rate,
    /// prorated by day. Jurisdictions without an interest requirement
    /// accrue nothing. The accrued amount is owed to the tenant and
    /// settles at disposition.
    ///
    /// # Errors
    ///
    /// Returns `DepositNotFound`, `AlreadyDisposed`, or `LockContended`.
    pub fn accrue_interest(
        &self,
        deposit_id: DepositId,
        through: NaiveDate,
    ) -> Result<InterestAccrual, EngineError> {
        let lock = self.deposit_lock(deposit_id);
        let _guard = self.acquire(&lock, &deposit_id.to_string())?;

        let deposit = self.deposits.get(deposit_id)?;
        if deposit.status.is_terminal() {
            return Err(DepositError::AlreadyDisposed(deposit_id).into());
        }

        let rule = rules_for(deposit.jurisdiction);
        let days = (through - deposit.accrued_through).num_days();
        let Some(rate) = rule.interest_annual_rate else {
            return Ok(InterestAccrual {
                amount: Decimal::ZERO,
                days: 0,
                entry: None,
            });
        };
        if days <= 0 {
            return Ok(InterestAccrual {
                amount: Decimal::ZERO,
                days: 0,
                entry: None,
            });
        }

        let amount = round_money(deposit.principal * rate * Decimal::from(days) / DAYS_PER_YEAR);
        if amount.is_zero() {
            self.deposits.update(deposit_id, |deposit| {
                deposit.accrued_through = through;
                Ok(())
            })?;
            return Ok(InterestAccrual {
                amount,
                days,
                entry: None,
            });
        }

        let entry = self.journal.post(PostingInput {
            date: through,
            description: format!("Interest accrual on deposit {deposit_id}"),
            reference: Reference::new(ReferenceKind::InterestAccrual, deposit_id.to_string()),
            lines: vec![
                LineInput::new(codes::TRUST_CASH, Side::Debit, amount),
                LineInput::new(codes::INTEREST_PAYABLE, Side::Credit, amount),
            ],
            idempotency_key: None,
        })?;
        self.deposits.update(deposit_id, |deposit| {
            deposit.interest_accrued += amount;
            deposit.accrued_through = through;
            Ok(())
        })?;

        tracing::info!(deposit = %deposit_id, amount = %amount, days, "accrued deposit interest");
        Ok(InterestAccrual {
            amount,
            days,
            entry: Some(entry.id),
        })
    }

    /// Records the tenant's move-out and opens the return window.
    ///
    /// # Errors
    ///
    /// Returns `DepositNotFound`, `InvalidTransition`, or `LockContended`.
    pub fn begin_return(
        &self,
        deposit_id: DepositId,
        move_out_date: NaiveDate,
        inspection_notes: Option<String>,
    ) -> Result<SecurityDeposit, EngineError> {
        let lock = self.deposit_lock(deposit_id);
        let _guard = self.acquire(&lock, &deposit_id.to_string())?;

        self.deposits.update(deposit_id, |deposit| {
            if !deposit.status.can_transition_to(DepositStatus::PendingReturn) {
                return Err(DepositError::InvalidTransition {
                    from: deposit.status,
                    to: DepositStatus::PendingReturn,
                });
            }
            let rule = rules_for(deposit.jurisdiction);
            deposit.status = DepositStatus::PendingReturn;
            deposit.move_out_date = Some(move_out_date);
            deposit.refund_deadline =
                Some(move_out_date + chrono::Duration::days(rule.refund_deadline_days));
            deposit.inspection_notes = inspection_notes;
            Ok(())
        })?;

        let deposit = self.deposits.get(deposit_id)?;
        tracing::info!(
            deposit = %deposit_id,
            deadline = ?deposit.refund_deadline,
            "deposit return started"
        );
        Ok(deposit)
    }

    /// Itemizes a deduction against a deposit pending return.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` before `begin_return`,
    /// `DeductionExceedsDeposit`, `InvalidDeductionAmount`, or
    /// `LockContended`.
    pub fn add_deduction(
        &self,
        deposit_id: DepositId,
        category: DeductionCategory,
        amount: Decimal,
        description: impl Into<String>,
        documentation_ref: Option<String>,
    ) -> Result<Deduction, EngineError> {
        let lock = self.deposit_lock(deposit_id);
        let _guard = self.acquire(&lock, &deposit_id.to_string())?;

        let description = description.into();
        let deduction = self.deposits.update(deposit_id, |deposit| {
            if deposit.status == DepositStatus::Held {
                return Err(DepositError::InvalidTransition {
                    from: deposit.status,
                    to: DepositStatus::PendingReturn,
                });
            }
            validate_deduction(deposit, amount)?;
            let deduction = Deduction {
                id: DeductionId::new(),
                category,
                amount,
                description,
                documentation_ref,
            };
            deposit.deductions.push(deduction.clone());
            Ok(deduction)
        })?;

        tracing::info!(deposit = %deposit_id, amount = %amount, "itemized deduction");
        Ok(deduction)
    }

    /// Finalizes a deposit: settles deductions, refunds the remainder,
    /// and releases the principal from the trust pool.
    ///
    /// # Errors
    ///
    /// Returns `DepositNotFound`, `AlreadyDisposed`, `InvalidTransition`,
    /// a journal error, or `LockContended`.
    pub fn dispose_deposit(
        &self,
        deposit_id: DepositId,
        disposition_date: NaiveDate,
        forwarding_address: Option<String>,
    ) -> Result<SecurityDeposit, EngineError> {
        let lock = self.deposit_lock(deposit_id);
        let _guard = self.acquire(&lock, &deposit_id.to_string())?;

        if self.deposits.get(deposit_id)?.status == DepositStatus::PendingReturn {
            self.deposits
                .transition(deposit_id, DepositStatus::Processing)?;
        }
        let deposit = self.deposits.get(deposit_id)?;
        let plan = plan_disposition(&deposit, disposition_date, forwarding_address)?;

        for posting in &plan.deduction_postings {
            let deduction = &posting.deduction;
            let revenue = match deduction.category {
                DeductionCategory::UnpaidRent => codes::RENT_INCOME,
                _ => codes::DAMAGE_RECOVERY_INCOME,
            };
            let mut lines = Vec::with_capacity(3);
            if !posting.from_principal.is_zero() {
                lines.push(LineInput::new(
                    codes::DEPOSIT_LIABILITY,
                    Side::Debit,
                    posting.from_principal,
                ));
            }
            if !posting.from_interest.is_zero() {
                lines.push(LineInput::new(
                    codes::INTEREST_PAYABLE,
                    Side::Debit,
                    posting.from_interest,
                ));
            }
            lines.push(
                LineInput::new(revenue, Side::Credit, deduction.amount)
                    .with_memo(deduction.description.clone()),
            );
            self.journal.post(PostingInput {
                date: disposition_date,
                description: format!("Deposit deduction: {}", deduction.description),
                reference: Reference::new(ReferenceKind::DepositDeduction, deduction.id.to_string()),
                lines,
                idempotency_key: None,
            })?;
        }

        if !plan.refund.is_zero() {
            let mut lines = Vec::with_capacity(3);
            if !plan.refund_from_principal.is_zero() {
                lines.push(LineInput::new(
                    codes::DEPOSIT_LIABILITY,
                    Side::Debit,
                    plan.refund_from_principal,
                ));
            }
            if !plan.refund_from_interest.is_zero() {
                lines.push(LineInput::new(
                    codes::INTEREST_PAYABLE,
                    Side::Debit,
                    plan.refund_from_interest,
                ));
            }
            lines.push(
                LineInput::new(codes::TRUST_CASH, Side::Credit, plan.refund)
                    .with_party(deposit.party),
            );
            self.journal.post(PostingInput {
                date: disposition_date,
                description: format!("Deposit refund for lease {}", deposit.lease),
                reference: Reference::new(
                    ReferenceKind::DepositDisposition,
                    deposit_id.to_string(),
                ),
                lines,
                idempotency_key: None,
            })?;
        }

        let outcome = plan.outcome;
        let disposition = plan.disposition;
        {
            let _commit = self.begin_commit();
            self.pools
                .deposit_released(deposit.jurisdiction, deposit.principal);
            self.deposits.update(deposit_id, |deposit| {
                if !deposit.status.can_transition_to(outcome) {
                    return Err(DepositError::InvalidTransition {
                        from: deposit.status,
                        to: outcome,
                    });
                }
                deposit.status = outcome;
                deposit.disposition = Some(disposition.clone());
                Ok(())
            })?;
        }
        self.balances.recompute(deposit.party);

        let deposit = self.deposits.get(deposit_id)?;
        tracing::info!(
            deposit = %deposit_id,
            outcome = %outcome,
            refund = %plan.refund,
            compliant = deposit.disposition.as_ref().is_some_and(|d| d.is_compliant),
            "deposit disposed"
        );
        Ok(deposit)
    }

    /// Forfeits the entire deposit to the landlord.
    ///
    /// An explicit decision (e.g. abandonment), never inferred from
    /// deduction totals, and only valid when no deductions were itemized.
    ///
    /// # Errors
    ///
    /// Returns `ForfeitRequiresNoDeductions`, `AlreadyDisposed`, a journal
    /// error, or `LockContended`.
    pub fn forfeit_deposit(
        &self,
        deposit_id: DepositId,
        disposition_date: NaiveDate,
    ) -> Result<SecurityDeposit, EngineError> {
        let lock = self.deposit_lock(deposit_id);
        let _guard = self.acquire(&lock, &deposit_id.to_string())?;

        let deposit = self.deposits.get(deposit_id)?;
        let plan = plan_forfeiture(&deposit, disposition_date)?;

        let total = deposit.principal + deposit.interest_accrued;
        let mut lines = Vec::with_capacity(3);
        lines.push(LineInput::new(
            codes::DEPOSIT_LIABILITY,
            Side::Debit,
            deposit.principal,
        ));
        if !deposit.interest_accrued.is_zero() {
            lines.push(LineInput::new(
                codes::INTEREST_PAYABLE,
                Side::Debit,
                deposit.interest_accrued,
            ));
        }
        lines.push(LineInput::new(
            codes::DAMAGE_RECOVERY_INCOME,
            Side::Credit,
            total,
        ));
        self.journal.post(PostingInput {
            date: disposition_date,
            description: format!("Deposit forfeiture for lease {}", deposit.lease),
            reference: Reference::new(ReferenceKind::DepositDisposition, deposit_id.to_string()),
            lines,
            idempotency_key: None,
        })?;

        let disposition = plan.disposition;
        {
            let _commit = self.begin_commit();
            self.pools
                .deposit_released(deposit.jurisdiction, deposit.principal);
            self.deposits.update(deposit_id, |deposit| {
                if !deposit.status.can_transition_to(DepositStatus::Forfeited) {
                    return Err(DepositError::InvalidTransition {
                        from: deposit.status,
                        to: DepositStatus::Forfeited,
                    });
                }
                deposit.status = DepositStatus::Forfeited;
                deposit.disposition = Some(disposition.clone());
                Ok(())
            })?;
        }

        tracing::info!(deposit = %deposit_id, amount = %total, "deposit forfeited");
        self.deposits.get(deposit_id).map_err(EngineError::from)
    }

    /// Voids a posted entry, retaining its lines for audit.
    ///
    /// Parties tagged on the entry have their projections refreshed so
    /// the voided lines drop out immediately.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `AlreadyVoid`.
    pub fn void_entry(
        &self,
        entry_id: JournalEntryId,
        reason: impl Into<String>,
    ) -> Result<JournalEntry, EngineError> {
        let entry = self.journal.void(entry_id, reason)?;
        for party in entry.lines.iter().filter_map(|line| line.party) {
            self.balances.recompute(party);
        }
        Ok(entry)
    }

    /// The party's projected balance, deriving it on a cache miss.
    #[must_use]
    pub fn balance_of(&self, party: PartyId) -> Decimal {
        self.balances.balance_or_recompute(party)
    }

    /// The statutory rule record for a jurisdiction.
    #[must_use]
    pub fn rules_for(&self, jurisdiction: Jurisdiction) -> &'static ComplianceRule {
        rules_for(jurisdiction)
    }

    /// Runs the consistency audit over current state.
    ///
    /// Blocks until no pool-and-status commit is in flight, so the audit
    /// sees every disposition either entirely applied or not at all.
    #[must_use]
    pub fn audit(&self) -> ValidationReport {
        let _exclusive = self.quiesce_commits();
        let late_fees = self.read_late_fees().clone();
        ConsistencyValidator::new(
            &self.journal,
            &self.pools,
            &self.deposits,
            &self.balances,
            &late_fees,
        )
        .run()
    }

    /// The underlying journal (read access for reporting).
    #[must_use]
    pub fn journal(&self) -> &JournalEngine {
        &self.journal
    }

    /// Current trust pool snapshot.
    #[must_use]
    pub fn trust_snapshot(&self) -> Vec<TrustAccount> {
        self.pools.snapshot()
    }

    /// The trust pool balance for a jurisdiction.
    #[must_use]
    pub fn trust_balance(&self, jurisdiction: Jurisdiction) -> Decimal {
        self.pools.balance(jurisdiction)
    }

    /// Looks up a deposit by ID.
    ///
    /// # Errors
    ///
    /// Returns `DepositNotFound`.
    pub fn deposit(&self, deposit_id: DepositId) -> Result<SecurityDeposit, EngineError> {
        self.deposits.get(deposit_id).map_err(EngineError::from)
    }

    fn deposit_lock(&self, deposit_id: DepositId) -> Arc<Mutex<()>> {
        self.deposit_locks
            .entry(deposit_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn party_lock(&self, party: PartyId) -> Arc<Mutex<()>> {
        self.party_locks
            .entry(party)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Bounded lock acquisition with doubling backoff.
    fn acquire<'a>(
        &self,
        lock: &'a Mutex<()>,
        subject: &str,
    ) -> Result<MutexGuard<'a, ()>, EngineError> {
        let mut backoff = self.config.locking.backoff_ms;
        for attempt in 1..=self.config.locking.max_attempts {
            match lock.try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) => {
                    tracing::debug!(subject, attempt, backoff_ms = backoff, "lock contended");
                    thread::sleep(Duration::from_millis(backoff));
                    backoff = backoff.saturating_mul(2);
                }
            }
        }
        Err(EngineError::LockContended {
            subject: subject.to_string(),
            attempts: self.config.locking.max_attempts,
        })
    }

    fn begin_commit(&self) -> std::sync::RwLockReadGuard<'_, ()> {
        self.commits
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn quiesce_commits(&self) -> std::sync::RwLockWriteGuard<'_, ()> {
        self.commits
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn read_late_fees(&self) -> std::sync::RwLockReadGuard<'_, Vec<LateFeeRecord>> {
        self.late_fees
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_late_fees(&self) -> std::sync::RwLockWriteGuard<'_, Vec<LateFeeRecord>> {
        self.late_fees
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for LedgerEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
