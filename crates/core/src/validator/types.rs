//! Audit findings and the validation report.

use serde::{Deserialize, Serialize};

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth investigating; books are still usable.
    Warning,
    /// Books cannot be trusted until resolved.
    Critical,
}

/// Which check produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Every posted entry balances within the ledger tolerance.
    DoubleEntry,
    /// Trust pool balances reconcile against held deposit principal.
    TrustReconciliation,
    /// Deposits and posted fees respect statutory limits and deadlines.
    Compliance,
    /// Cached party balances match what the journal derives.
    BalanceDrift,
}

/// A single audit finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// The check that produced this finding.
    pub check: CheckKind,
    /// Severity of the finding.
    pub severity: Severity,
    /// Identifier of the record at fault (entry, deposit, party, ...).
    pub subject: String,
    /// Human-readable description.
    pub message: String,
}

/// The result of a full audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All findings, in check order.
    pub findings: Vec<Finding>,
    /// Number of posted entries examined.
    pub entries_checked: usize,
    /// Number of deposits examined.
    pub deposits_checked: usize,
}

impl ValidationReport {
    /// Returns true if the audit produced no findings at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Returns true if any finding is critical.
    #[must_use]
    pub fn has_critical(&self) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.severity == Severity::Critical)
    }

    /// Findings produced by one check.
    #[must_use]
    pub fn findings_for(&self, check: CheckKind) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.check == check)
            .collect()
    }

    /// Count of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
            .count()
    }

    /// Count of critical findings.
    #[must_use]
    pub fn critical_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Critical)
            .count()
    }
}
