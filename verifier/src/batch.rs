//! Concurrent batch orchestration.

use crate::backoff;
use crate::cancel::CancelHandle;
use crate::classify::classify;
use crate::config::{ConfigError, VerifyConfig};
use crate::progress::{ProgressEvent, ProgressSender};

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};
use trustscan_client::{LedgerClient, LedgerError};
use trustscan_types::{
    AccountId, AssetRef, ErrorKind, Summary, TrustLine, VerificationOutcome, VerificationResult,
};

/// Everything a finished run produces: one result per input position, in
/// input order, plus the aggregate summary.
#[derive(Debug)]
pub struct BatchReport {
    pub results: Vec<VerificationResult>,
    pub summary: Summary,
}

/// Orchestrates verification of many accounts against one target asset.
///
/// Each account gets an independent task; a semaphore bounds how many ledger
/// queries are in flight at once. One account's failure never aborts the
/// batch — every failure mode lands in that account's result.
pub struct BatchVerifier<C> {
    client: Arc<C>,
    target: Arc<AssetRef>,
    config: VerifyConfig,
    cancel: CancelHandle,
    progress: Option<ProgressSender>,
}

impl<C: LedgerClient + 'static> BatchVerifier<C> {
    /// Build a verifier; rejects invalid configuration before any task runs.
    pub fn new(client: Arc<C>, target: AssetRef, config: VerifyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            client,
            target: Arc::new(target),
            config,
            cancel: CancelHandle::new(),
            progress: None,
        })
    }

    /// Attach a progress observer. Events are emitted once per settled
    /// account; a dropped receiver never affects the run.
    pub fn with_progress(mut self, sender: ProgressSender) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Handle for cancelling this run from outside (e.g. a signal handler).
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Verify every account and aggregate once all tasks have settled.
    ///
    /// Task handles are kept aligned with input positions, so the result
    /// vector is assembled in input order no matter the completion order,
    /// and the summary is deterministic for deterministic classifier input.
    pub async fn verify_batch(&self, accounts: &[AccountId]) -> BatchReport {
        let total = accounts.len();
        let gate = Arc::new(Semaphore::new(self.config.max_concurrency));
        let completed = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(total);
        for account in accounts.iter().cloned() {
            let task = VerifyTask {
                client: Arc::clone(&self.client),
                target: Arc::clone(&self.target),
                config: self.config.clone(),
                cancel: self.cancel.clone(),
                gate: Arc::clone(&gate),
            };
            let progress = self.progress.clone();
            let completed = Arc::clone(&completed);
            handles.push(tokio::spawn(async move {
                let result = task.run(account).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(tx) = progress {
                    let _ = tx.send(ProgressEvent {
                        account: result.account.clone(),
                        outcome_tag: result.outcome.tag(),
                        completed: done,
                        total,
                    });
                }
                result
            }));
        }

        let mut results = Vec::with_capacity(total);
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    // A panicked task still yields a result for its slot.
                    warn!(index, "verification task died: {e}");
                    results.push(VerificationResult {
                        account: accounts[index].clone(),
                        outcome: VerificationOutcome::Error {
                            kind: ErrorKind::Protocol,
                            message: format!("verification task died: {e}"),
                        },
                        query_duration_ms: 0,
                        retries_used: 0,
                    });
                }
            }
        }

        let summary = Summary::from_results(&results);
        BatchReport { results, summary }
    }
}

/// State captured per spawned account task.
struct VerifyTask<C> {
    client: Arc<C>,
    target: Arc<AssetRef>,
    config: VerifyConfig,
    cancel: CancelHandle,
    gate: Arc<Semaphore>,
}

impl<C: LedgerClient> VerifyTask<C> {
    async fn run(self, account: AccountId) -> VerificationResult {
        // Subscribe before the flag check so a cancel in between is not lost.
        let mut cancel_rx = self.cancel.subscribe();
        if self.cancel.is_cancelled() {
            return cancelled_result(account, 0, 0);
        }

        // Admission: wait for a gate slot, unless cancellation wins the race.
        let permit = tokio::select! {
            permit = Arc::clone(&self.gate).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return cancelled_result(account, 0, 0),
            },
            _ = cancel_rx.recv() => return cancelled_result(account, 0, 0),
        };

        let started = Instant::now();
        let retries = AtomicU32::new(0);
        let deadline = Duration::from_millis(self.config.per_account_timeout_ms);

        let outcome = tokio::select! {
            attempt = timeout(deadline, self.query_with_retries(&account, &retries)) => {
                match attempt {
                    Ok(Ok(lines)) => classify(&lines, &self.target),
                    Ok(Err(error)) => VerificationOutcome::Error {
                        kind: error.kind(),
                        message: error.to_string(),
                    },
                    Err(_) => VerificationOutcome::Error {
                        kind: ErrorKind::Timeout,
                        message: format!(
                            "query exceeded {}ms deadline",
                            self.config.per_account_timeout_ms
                        ),
                    },
                }
            }
            _ = cancel_rx.recv() => VerificationOutcome::Error {
                kind: ErrorKind::Cancelled,
                message: "run cancelled".into(),
            },
        };

        drop(permit);
        VerificationResult {
            account,
            outcome,
            query_duration_ms: started.elapsed().as_millis() as u64,
            retries_used: retries.load(Ordering::SeqCst),
        }
    }

    /// Query the ledger, retrying transient failures with jittered backoff.
    /// `retries` is shared with the caller so the count survives the
    /// deadline/cancel race.
    async fn query_with_retries(
        &self,
        account: &AccountId,
        retries: &AtomicU32,
    ) -> Result<Vec<TrustLine>, LedgerError> {
        loop {
            let used = retries.load(Ordering::SeqCst);
            match self.client.account_lines(account).await {
                Ok(lines) => return Ok(lines),
                Err(error) if error.is_transient() && used < self.config.max_retries => {
                    let hint = match &error {
                        LedgerError::RateLimited { retry_after_ms, .. } => *retry_after_ms,
                        _ => None,
                    };
                    let delay = backoff::delay_with_hint(
                        used,
                        self.config.backoff_base_ms,
                        self.config.backoff_max_ms,
                        hint,
                    );
                    debug!(
                        %account,
                        attempt = used + 1,
                        delay_ms = delay.as_millis() as u64,
                        "transient ledger error, backing off: {error}"
                    );
                    tokio::time::sleep(delay).await;
                    retries.fetch_add(1, Ordering::SeqCst);
                }
                Err(error) => return Err(error),
            }
        }
    }
}

fn cancelled_result(account: AccountId, duration_ms: u64, retries: u32) -> VerificationResult {
    VerificationResult {
        account,
        outcome: VerificationOutcome::Error {
            kind: ErrorKind::Cancelled,
            message: "run cancelled".into(),
        },
        query_duration_ms: duration_ms,
        retries_used: retries,
    }
}
