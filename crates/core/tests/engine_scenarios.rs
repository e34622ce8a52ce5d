//! End-to-end scenarios exercised through the engine facade.

use chrono::{Duration, NaiveDate};
use propledger_core::compliance::Jurisdiction;
use propledger_core::deposit::DeductionCategory;
use propledger_core::deposit::DepositStatus;
use propledger_core::validator::CheckKind;
use propledger_core::LedgerEngine;
use propledger_shared::types::{LeaseId, PartyId};
use rust_decimal_macros::dec;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

fn init_tracing() {
    // Idempotent; later calls lose the race and that is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter("propledger_core=debug")
        .with_test_writer()
        .try_init();
}

/// NC, rent $1,500, principal $2,500: within the $3,000 cap.
#[test]
fn scenario_nc_deposit_within_cap() {
    let engine = LedgerEngine::default();
    let deposit = engine
        .collect_deposit(
            PartyId::new(),
            LeaseId::new(),
            dec!(2500),
            dec!(1500),
            Jurisdiction::Nc,
            date(1, 1),
        )
        .unwrap();

    assert_eq!(deposit.status, DepositStatus::Held);
    assert_eq!(engine.trust_balance(Jurisdiction::Nc), dec!(2500));
    assert!(engine.audit().is_clean());
}

/// NC, rent $1,500, principal $4,000: rejected, message cites the cap.
#[test]
fn scenario_nc_deposit_over_cap_cites_limit() {
    let engine = LedgerEngine::default();
    let err = engine
        .collect_deposit(
            PartyId::new(),
            LeaseId::new(),
            dec!(4000),
            dec!(1500),
            Jurisdiction::Nc,
            date(1, 1),
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Deposit of $4,000.00 exceeds NC maximum of 2 months rent ($3,000.00)"
    );
    // Nothing was recorded anywhere.
    assert_eq!(engine.journal().entry_count(), 0);
    assert_eq!(engine.trust_balance(Jurisdiction::Nc), dec!(0));
    assert!(engine.audit().is_clean());
}

/// NC, rent $1,850, 29 days late with 5-day grace: fee is 5% = $92.50.
#[test]
fn scenario_nc_late_fee() {
    let engine = LedgerEngine::default();
    let party = PartyId::new();

    let charge = engine
        .post_late_fee(
            party,
            LeaseId::new(),
            dec!(1850),
            date(1, 1),
            date(1, 30),
            Jurisdiction::Nc,
            None,
        )
        .unwrap();

    assert_eq!(charge.assessment.amount, dec!(92.50));
    assert_eq!(charge.assessment.days_late, 29);
    assert_eq!(engine.balance_of(party), dec!(92.50));
}

/// Principal $2,000 with $200 cleaning + $300 repairs: refund $1,500,
/// status partial_refund.
#[test]
fn scenario_partial_refund_disposition() {
    let engine = LedgerEngine::default();
    let deposit = engine
        .collect_deposit(
            PartyId::new(),
            LeaseId::new(),
            dec!(2000),
            dec!(1500),
            Jurisdiction::Nc,
            date(1, 1),
        )
        .unwrap();

    engine.begin_return(deposit.id, date(6, 30), None).unwrap();
    engine
        .add_deduction(
            deposit.id,
            DeductionCategory::Cleaning,
            dec!(200),
            "carpet cleaning",
            None,
        )
        .unwrap();
    engine
        .add_deduction(
            deposit.id,
            DeductionCategory::Repair,
            dec!(300),
            "drywall repair",
            None,
        )
        .unwrap();

    let disposed = engine
        .dispose_deposit(deposit.id, date(7, 15), None)
        .unwrap();

    assert_eq!(disposed.status, DepositStatus::PartialRefund);
    let disposition = disposed.disposition.unwrap();
    assert_eq!(disposition.refund_amount, dec!(1500));
    assert_eq!(disposition.total_deductions, dec!(500));
    assert!(engine.audit().is_clean());
}

/// NC disposition 35 days after move-out misses the 30-day deadline.
#[test]
fn scenario_late_disposition_is_noncompliant() {
    let engine = LedgerEngine::default();
    let deposit = engine
        .collect_deposit(
            PartyId::new(),
            LeaseId::new(),
            dec!(2000),
            dec!(1500),
            Jurisdiction::Nc,
            date(1, 1),
        )
        .unwrap();

    let move_out = date(6, 1);
    engine.begin_return(deposit.id, move_out, None).unwrap();
    let disposed = engine
        .dispose_deposit(deposit.id, move_out + Duration::days(35), None)
        .unwrap();

    assert!(!disposed.disposition.as_ref().unwrap().is_compliant);

    // The missed deadline surfaces as a compliance warning, not an error.
    let report = engine.audit();
    let findings = report.findings_for(CheckKind::Compliance);
    assert_eq!(findings.len(), 1);
    assert!(!report.has_critical());
}

/// Two NC deposits pool to $4,500; disposing the first (no deductions)
/// leaves $2,500.
#[test]
fn scenario_trust_pool_accumulates_and_releases() {
    let engine = LedgerEngine::default();
    let first = engine
        .collect_deposit(
            PartyId::new(),
            LeaseId::new(),
            dec!(2000),
            dec!(1500),
            Jurisdiction::Nc,
            date(1, 1),
        )
        .unwrap();
    engine
        .collect_deposit(
            PartyId::new(),
            LeaseId::new(),
            dec!(2500),
            dec!(1500),
            Jurisdiction::Nc,
            date(1, 2),
        )
        .unwrap();

    assert_eq!(engine.trust_balance(Jurisdiction::Nc), dec!(4500));

    engine.begin_return(first.id, date(6, 30), None).unwrap();
    let disposed = engine.dispose_deposit(first.id, date(7, 10), None).unwrap();

    assert_eq!(disposed.status, DepositStatus::Returned);
    assert_eq!(engine.trust_balance(Jurisdiction::Nc), dec!(2500));
    assert!(engine.audit().is_clean());
}

/// Disposing deposits on one thread while auditing on another never
/// yields a trust-reconciliation finding: the pool release and the
/// status change commit as one unit.
#[test]
fn concurrent_audit_sees_only_committed_dispositions() {
    init_tracing();
    let engine = LedgerEngine::default();

    std::thread::scope(|scope| {
        let worker = scope.spawn(|| {
            for _ in 0..50 {
                let deposit = engine
                    .collect_deposit(
                        PartyId::new(),
                        LeaseId::new(),
                        dec!(2000),
                        dec!(1500),
                        Jurisdiction::Nc,
                        date(1, 1),
                    )
                    .unwrap();
                engine.begin_return(deposit.id, date(6, 1), None).unwrap();
                engine
                    .dispose_deposit(deposit.id, date(6, 20), None)
                    .unwrap();
            }
        });

        while !worker.is_finished() {
            let report = engine.audit();
            assert!(
                report
                    .findings_for(CheckKind::TrustReconciliation)
                    .is_empty(),
                "audit observed a half-committed disposition: {:?}",
                report.findings
            );
        }
        worker.join().unwrap();
    });

    assert_eq!(engine.trust_balance(Jurisdiction::Nc), dec!(0));
    assert!(engine.audit().is_clean());
}

/// A multi-tenant month: charges, a late fee, deposits, and a full
/// lifecycle, with the books clean at every checkpoint.
#[test]
fn scenario_mixed_month_stays_consistent() {
    init_tracing();
    let engine = LedgerEngine::default();
    let alice = PartyId::new();
    let bob = PartyId::new();
    let lease_a = LeaseId::new();
    let lease_b = LeaseId::new();

    engine
        .post_charge(alice, lease_a, dec!(1500), date(2, 1), None)
        .unwrap();
    engine
        .post_charge(bob, lease_b, dec!(1850), date(2, 1), None)
        .unwrap();
    engine
        .post_late_fee(
            bob,
            lease_b,
            dec!(1850),
            date(2, 1),
            date(2, 28),
            Jurisdiction::Nc,
            None,
        )
        .unwrap();

    let deposit = engine
        .collect_deposit(alice, lease_a, dec!(2000), dec!(1500), Jurisdiction::Md, date(2, 1))
        .unwrap();
    engine
        .accrue_interest(deposit.id, date(2, 1) + Duration::days(365))
        .unwrap();

    assert_eq!(engine.balance_of(alice), dec!(1500));
    assert_eq!(engine.balance_of(bob), dec!(1850) + dec!(92.50));
    assert!(engine.audit().is_clean());

    // Full MD lifecycle: interest owed on top of principal.
    engine
        .begin_return(deposit.id, date(3, 1) + Duration::days(365), None)
        .unwrap();
    let disposed = engine
        .dispose_deposit(deposit.id, date(3, 10) + Duration::days(365), None)
        .unwrap();

    // $2,000 principal + $30.00 interest (1.5% for one year), no deductions.
    assert_eq!(
        disposed.disposition.as_ref().unwrap().refund_amount,
        dec!(2030.00)
    );
    assert_eq!(engine.trust_balance(Jurisdiction::Md), dec!(0));
    assert!(engine.audit().is_clean());
}
