//! The four-check consistency audit.

use propledger_shared::types::{format_usd, RECONCILIATION_TOLERANCE};
use rust_decimal::Decimal;

use super::types::{CheckKind, Finding, Severity, ValidationReport};
use crate::balance::BalanceSynchronizer;
use crate::compliance::{max_deposit, DepositCap, Jurisdiction};
use crate::deposit::DepositStore;
use crate::journal::JournalEngine;
use crate::latefee::{statutory_maximum, LateFeeRecord};
use crate::trust::TrustPools;

/// Audits live state against the books' invariants.
///
/// Borrows everything it inspects; running an audit never mutates state
/// and never auto-corrects. Drift is reported, not repaired.
pub struct ConsistencyValidator<'a> {
    journal: &'a JournalEngine,
    pools: &'a TrustPools,
    deposits: &'a DepositStore,
    balances: &'a BalanceSynchronizer,
    late_fees: &'a [LateFeeRecord],
}

impl<'a> ConsistencyValidator<'a> {
    /// Creates a validator over the given state.
    #[must_use]
    pub fn new(
        journal: &'a JournalEngine,
        pools: &'a TrustPools,
        deposits: &'a DepositStore,
        balances: &'a BalanceSynchronizer,
        late_fees: &'a [LateFeeRecord],
    ) -> Self {
        Self {
            journal,
            pools,
            deposits,
            balances,
            late_fees,
        }
    }

    /// Runs all four checks and returns the report.
    #[must_use]
    pub fn run(&self) -> ValidationReport {
        let mut findings = Vec::new();

        let entries_checked = self.check_double_entry(&mut findings);
        self.check_trust_reconciliation(&mut findings);
        let deposits_checked = self.check_compliance(&mut findings);
        self.check_balance_drift(&mut findings);

        let report = ValidationReport {
            findings,
            entries_checked,
            deposits_checked,
        };
        tracing::info!(
            entries = report.entries_checked,
            deposits = report.deposits_checked,
            warnings = report.warning_count(),
            critical = report.critical_count(),
            "consistency audit complete"
        );
        report
    }

    /// Check 1: every posted entry balances within the ledger tolerance.
    fn check_double_entry(&self, findings: &mut Vec<Finding>) -> usize {
        let entries = self.journal.posted_entries();
        for entry in &entries {
            let totals = entry.totals();
            if totals.is_balanced {
                continue;
            }
            findings.push(Finding {
                check: CheckKind::DoubleEntry,
                severity: Severity::Critical,
                subject: entry.sequence_display(),
                message: format!(
                    "entry {} is imbalanced: debits {} vs credits {}",
                    entry.sequence_display(),
                    format_usd(totals.debits),
                    format_usd(totals.credits)
                ),
            });
        }
        entries.len()
    }

    /// Check 2: each pool equals the held principal in its jurisdiction.
    fn check_trust_reconciliation(&self, findings: &mut Vec<Finding>) {
        let deposits = self.deposits.all();
        for jurisdiction in Jurisdiction::ALL {
            let held: Decimal = deposits
                .iter()
                .filter(|deposit| {
                    deposit.jurisdiction == jurisdiction && !deposit.status.is_terminal()
                })
                .map(|deposit| deposit.principal)
                .sum();
            let pool = self.pools.balance(jurisdiction);
            let drift = (pool - held).abs();
            if drift <= RECONCILIATION_TOLERANCE {
                continue;
            }
            findings.push(Finding {
                check: CheckKind::TrustReconciliation,
                severity: Severity::Critical,
                subject: jurisdiction.to_string(),
                message: format!(
                    "{jurisdiction} trust pool holds {} but deposits require {}",
                    format_usd(pool),
                    format_usd(held)
                ),
            });
        }
    }

    /// Check 3: statutory limits, re-derived from retained facts.
    fn check_compliance(&self, findings: &mut Vec<Finding>) -> usize {
        let deposits = self.deposits.all();
        for deposit in &deposits {
            let cap = max_deposit(deposit.jurisdiction, deposit.monthly_rent_at_collection);
            if let DepositCap::Limited(limit) = cap {
                if deposit.principal > limit {
                    findings.push(Finding {
                        check: CheckKind::Compliance,
                        severity: Severity::Critical,
                        subject: deposit.id.to_string(),
                        message: format!(
                            "deposit {} of {} exceeds the {} cap of {}",
                            deposit.id,
                            format_usd(deposit.principal),
                            deposit.jurisdiction,
                            format_usd(limit)
                        ),
                    });
                }
            }
            if let Some(disposition) = &deposit.disposition {
                if !disposition.is_compliant {
                    findings.push(Finding {
                        check: CheckKind::Compliance,
                        severity: Severity::Warning,
                        subject: deposit.id.to_string(),
                        message: format!(
                            "deposit {} was disposed after the {} refund deadline",
                            deposit.id, deposit.jurisdiction
                        ),
                    });
                }
            }
        }

        for record in self.late_fees {
            let Some(limit) = statutory_maximum(record.monthly_rent, record.jurisdiction)
            else {
                continue;
            };
            if record.amount > limit {
                findings.push(Finding {
                    check: CheckKind::Compliance,
                    severity: Severity::Critical,
                    subject: record.lease.to_string(),
                    message: format!(
                        "late fee of {} on lease {} exceeds the {} statutory maximum of {}",
                        format_usd(record.amount),
                        record.lease,
                        record.jurisdiction,
                        format_usd(limit)
                    ),
                });
            }
        }
        deposits.len()
    }

    /// Check 4: cached projections agree with the journal.
    fn check_balance_drift(&self, findings: &mut Vec<Finding>) {
        for party in self.balances.cached_parties() {
            let cached = self.balances.balance_of(party);
            let derived = self.balances.derive(party).balance;
            let drift = (cached - derived).abs();
            let sign_flip = cached.is_sign_negative() != derived.is_sign_negative()
                && !cached.is_zero()
                && !derived.is_zero();
            if drift <= RECONCILIATION_TOLERANCE && !sign_flip {
                continue;
            }
            findings.push(Finding {
                check: CheckKind::BalanceDrift,
                severity: Severity::Warning,
                subject: party.to_string(),
                message: format!(
                    "party {party} projection {} has drifted from derived {}",
                    format_usd(cached),
                    format_usd(derived)
                ),
            });
        }
    }
}
