//! Behavioral tests for the batch engine against the scripted null ledger.

use std::sync::Arc;
use std::time::Duration;

use trustscan_client::LedgerError;
use trustscan_nullables::NullLedger;
use trustscan_types::{AccountId, AssetRef, ErrorKind, TrustLine, VerificationOutcome};
use trustscan_verifier::{progress_channel, BatchVerifier, VerifyConfig};

const ISSUER: &str = "rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH";

fn target() -> AssetRef {
    AssetRef::new(AccountId::new(ISSUER), "USD").unwrap()
}

fn usd_line() -> TrustLine {
    TrustLine::new(ISSUER, "USD", "100", "10")
}

fn quick_config() -> VerifyConfig {
    VerifyConfig {
        max_concurrency: 4,
        max_retries: 2,
        backoff_base_ms: 1,
        backoff_max_ms: 4,
        per_account_timeout_ms: 5_000,
    }
}

fn accounts(names: &[&str]) -> Vec<AccountId> {
    names.iter().map(|n| AccountId::new(*n)).collect()
}

#[tokio::test]
async fn every_account_settles_in_input_order() {
    let ledger = NullLedger::new();
    ledger.enqueue("rHolder", Ok(vec![usd_line()]));
    ledger.enqueue(
        "rOther",
        Ok(vec![TrustLine::new("rDifferentIssuer", "USD", "5", "1")]),
    );
    // "rEmpty" stays unscripted: zero trust lines.

    let verifier = BatchVerifier::new(Arc::new(ledger), target(), quick_config()).unwrap();
    let input = accounts(&["rHolder", "rOther", "rEmpty"]);
    let report = verifier.verify_batch(&input).await;

    assert_eq!(report.results.len(), 3);
    for (result, account) in report.results.iter().zip(&input) {
        assert_eq!(&result.account, account);
    }
    assert!(report.results[0].outcome.is_found());
    assert_eq!(report.results[1].outcome, VerificationOutcome::NotFound);
    assert_eq!(report.results[2].outcome, VerificationOutcome::NotFound);

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.found_count, 1);
    assert_eq!(report.summary.not_found_count, 2);
    assert_eq!(report.summary.error_count, 0);
    let missing: Vec<&str> = report
        .summary
        .missing_accounts
        .iter()
        .map(|a| a.as_str())
        .collect();
    assert_eq!(missing, vec!["rOther", "rEmpty"]);
}

#[tokio::test]
async fn transient_failures_retried_until_success() {
    let ledger = NullLedger::new();
    ledger.enqueue_errors("rFlaky", LedgerError::Network("blip".into()), 2);
    ledger.enqueue("rFlaky", Ok(vec![usd_line()]));

    let verifier = BatchVerifier::new(Arc::new(ledger), target(), quick_config()).unwrap();
    let report = verifier.verify_batch(&accounts(&["rFlaky"])).await;

    let result = &report.results[0];
    assert!(result.outcome.is_found());
    // Succeeded on the final allowed attempt.
    assert_eq!(result.retries_used, 2);
}

#[tokio::test]
async fn exhausted_retries_record_error_after_exact_attempts() {
    let ledger = Arc::new(NullLedger::new());
    ledger.enqueue("rDown", Err(LedgerError::Network("unreachable".into())));

    let verifier = BatchVerifier::new(Arc::clone(&ledger), target(), quick_config()).unwrap();
    let report = verifier.verify_batch(&accounts(&["rDown"])).await;

    let result = &report.results[0];
    match &result.outcome {
        VerificationOutcome::Error { kind, .. } => assert_eq!(*kind, ErrorKind::Network),
        other => panic!("expected Error, got {other:?}"),
    }
    assert_eq!(result.retries_used, 2);
    // max_retries + 1 attempts, no more.
    assert_eq!(ledger.calls(), 3);
    assert_eq!(report.summary.error_count, 1);
}

#[tokio::test]
async fn rate_limiting_is_retried_too() {
    let ledger = NullLedger::new();
    ledger.enqueue(
        "rThrottled",
        Err(LedgerError::RateLimited {
            message: "slow down".into(),
            retry_after_ms: Some(1),
        }),
    );
    ledger.enqueue("rThrottled", Ok(vec![usd_line()]));

    let verifier = BatchVerifier::new(Arc::new(ledger), target(), quick_config()).unwrap();
    let report = verifier.verify_batch(&accounts(&["rThrottled"])).await;

    assert!(report.results[0].outcome.is_found());
    assert_eq!(report.results[0].retries_used, 1);
}

#[tokio::test]
async fn account_not_found_is_terminal() {
    let ledger = Arc::new(NullLedger::new());
    ledger.enqueue(
        "rGone",
        Err(LedgerError::AccountNotFound("actNotFound".into())),
    );

    let verifier = BatchVerifier::new(Arc::clone(&ledger), target(), quick_config()).unwrap();
    let report = verifier.verify_batch(&accounts(&["rGone"])).await;

    match &report.results[0].outcome {
        VerificationOutcome::Error { kind, .. } => {
            assert_eq!(*kind, ErrorKind::AccountNotFound);
        }
        other => panic!("expected Error, got {other:?}"),
    }
    assert_eq!(ledger.calls(), 1);
    assert_eq!(report.results[0].retries_used, 0);
}

#[tokio::test]
async fn protocol_error_is_terminal() {
    let ledger = Arc::new(NullLedger::new());
    ledger.enqueue("rWeird", Err(LedgerError::Protocol("garbled".into())));

    let verifier = BatchVerifier::new(Arc::clone(&ledger), target(), quick_config()).unwrap();
    let report = verifier.verify_batch(&accounts(&["rWeird"])).await;

    match &report.results[0].outcome {
        VerificationOutcome::Error { kind, .. } => assert_eq!(*kind, ErrorKind::Protocol),
        other => panic!("expected Error, got {other:?}"),
    }
    assert_eq!(ledger.calls(), 1);
}

#[tokio::test]
async fn one_failure_never_aborts_the_batch() {
    let ledger = NullLedger::new();
    ledger.enqueue("rGood", Ok(vec![usd_line()]));
    ledger.enqueue("rBad", Err(LedgerError::Protocol("garbled".into())));

    let verifier = BatchVerifier::new(Arc::new(ledger), target(), quick_config()).unwrap();
    let report = verifier.verify_batch(&accounts(&["rBad", "rGood"])).await;

    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.found_count, 1);
    assert_eq!(report.summary.error_count, 1);
    assert!(report.results[1].outcome.is_found());
}

#[tokio::test]
async fn concurrency_gate_bounds_in_flight_queries() {
    let ledger = Arc::new(NullLedger::new().with_delay(Duration::from_millis(20)));
    let config = VerifyConfig {
        max_concurrency: 3,
        ..quick_config()
    };

    let input: Vec<AccountId> = (0..20).map(|i| AccountId::new(format!("rAcct{i}"))).collect();
    let verifier = BatchVerifier::new(Arc::clone(&ledger), target(), config).unwrap();
    let report = verifier.verify_batch(&input).await;

    assert_eq!(report.results.len(), 20);
    assert!(
        ledger.max_in_flight() <= 3,
        "gate leaked: {} queries in flight",
        ledger.max_in_flight()
    );
}

#[tokio::test]
async fn per_account_deadline_becomes_timeout_error() {
    let ledger = Arc::new(NullLedger::new());
    ledger.delay_account("rSlow", Duration::from_millis(500));
    ledger.enqueue("rFast", Ok(vec![usd_line()]));

    let config = VerifyConfig {
        per_account_timeout_ms: 50,
        ..quick_config()
    };
    let verifier = BatchVerifier::new(Arc::clone(&ledger), target(), config).unwrap();
    let report = verifier.verify_batch(&accounts(&["rSlow", "rFast"])).await;

    match &report.results[0].outcome {
        VerificationOutcome::Error { kind, .. } => assert_eq!(*kind, ErrorKind::Timeout),
        other => panic!("expected Timeout, got {other:?}"),
    }
    assert!(report.results[1].outcome.is_found());
}

#[tokio::test]
async fn cancellation_settles_outstanding_tasks_and_keeps_finished_ones() {
    let ledger = Arc::new(NullLedger::new());
    ledger.enqueue("rQuick", Ok(vec![usd_line()]));
    for name in ["rStuck1", "rStuck2", "rStuck3"] {
        ledger.delay_account(name, Duration::from_secs(5));
    }

    let verifier = Arc::new(
        BatchVerifier::new(Arc::clone(&ledger), target(), quick_config()).unwrap(),
    );
    let cancel = verifier.cancel_handle();

    let input = accounts(&["rQuick", "rStuck1", "rStuck2", "rStuck3"]);
    let run = {
        let verifier = Arc::clone(&verifier);
        tokio::spawn(async move { verifier.verify_batch(&input).await })
    };

    // Let the quick account settle, then pull the plug.
    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();

    let report = tokio::time::timeout(Duration::from_secs(2), run)
        .await
        .expect("cancellation must settle the batch promptly")
        .unwrap();

    assert!(report.results[0].outcome.is_found());
    for result in &report.results[1..] {
        match &result.outcome {
            VerificationOutcome::Error { kind, .. } => assert_eq!(*kind, ErrorKind::Cancelled),
            other => panic!("expected Cancelled, got {other:?}"),
        }
    }
    assert_eq!(report.summary.found_count, 1);
    assert_eq!(report.summary.error_count, 3);
}

#[tokio::test]
async fn duplicate_input_positions_each_get_a_result() {
    let ledger = NullLedger::new();
    ledger.enqueue("rTwice", Ok(vec![usd_line()]));

    let verifier = BatchVerifier::new(Arc::new(ledger), target(), quick_config()).unwrap();
    let report = verifier.verify_batch(&accounts(&["rTwice", "rTwice"])).await;

    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.account.as_str() == "rTwice"));
    // Sticky scripted response: both positions resolve independently.
    assert!(report.results.iter().all(|r| r.outcome.is_found()));
}

#[tokio::test]
async fn progress_events_cover_every_account_exactly_once() {
    let ledger = NullLedger::new();
    ledger.enqueue("rHolder", Ok(vec![usd_line()]));

    let (tx, mut rx) = progress_channel();
    let verifier = BatchVerifier::new(Arc::new(ledger), target(), quick_config())
        .unwrap()
        .with_progress(tx);

    let input = accounts(&["rHolder", "rEmptyOne", "rEmptyTwo"]);
    let report = verifier.verify_batch(&input).await;
    assert_eq!(report.summary.total, 3);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.total == 3));

    let mut completed: Vec<usize> = events.iter().map(|e| e.completed).collect();
    completed.sort_unstable();
    assert_eq!(completed, vec![1, 2, 3]);

    let mut seen: Vec<&str> = events.iter().map(|e| e.account.as_str()).collect();
    seen.sort_unstable();
    assert_eq!(seen, vec!["rEmptyOne", "rEmptyTwo", "rHolder"]);
}

#[tokio::test]
async fn empty_input_produces_empty_report() {
    let verifier =
        BatchVerifier::new(Arc::new(NullLedger::new()), target(), quick_config()).unwrap();
    let report = verifier.verify_batch(&[]).await;
    assert!(report.results.is_empty());
    assert_eq!(report.summary.total, 0);
}

#[tokio::test]
async fn invalid_config_is_rejected_before_any_task() {
    let config = VerifyConfig {
        max_concurrency: 0,
        ..quick_config()
    };
    assert!(BatchVerifier::new(Arc::new(NullLedger::new()), target(), config).is_err());
}
