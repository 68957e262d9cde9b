//! Nullable ledger client — scripted responses, no network.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use trustscan_client::{LedgerClient, LedgerError};
use trustscan_types::{AccountId, TrustLine};

type Response = Result<Vec<TrustLine>, LedgerError>;

/// Per-account script: queued responses are consumed in order; once the
/// queue drains, the last consumed response repeats. That covers both
/// "fail N times then succeed" and "fail forever" with one mechanism.
struct Script {
    queue: VecDeque<Response>,
    last: Option<Response>,
}

impl Script {
    fn next(&mut self) -> Option<Response> {
        if let Some(response) = self.queue.pop_front() {
            self.last = Some(response.clone());
            return Some(response);
        }
        self.last.clone()
    }
}

/// A test ledger client that replays programmed responses.
///
/// Unscripted accounts answer with an empty line set. The client counts
/// concurrent entries so tests can assert the verifier's concurrency gate.
pub struct NullLedger {
    scripts: Mutex<HashMap<AccountId, Script>>,
    delays: Mutex<HashMap<AccountId, Duration>>,
    default_delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            default_delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Apply an artificial latency to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// Queue one response for an account.
    pub fn enqueue(&self, account: impl Into<AccountId>, response: Response) {
        let mut scripts = self.scripts.lock().unwrap();
        scripts
            .entry(account.into())
            .or_insert_with(|| Script {
                queue: VecDeque::new(),
                last: None,
            })
            .queue
            .push_back(response);
    }

    /// Queue `times` copies of an error for an account.
    pub fn enqueue_errors(&self, account: impl Into<AccountId>, error: LedgerError, times: u32) {
        let account = account.into();
        for _ in 0..times {
            self.enqueue(account.clone(), Err(error.clone()));
        }
    }

    /// Override the latency for one specific account.
    pub fn delay_account(&self, account: impl Into<AccountId>, delay: Duration) {
        self.delays.lock().unwrap().insert(account.into(), delay);
    }

    /// Total calls observed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously in-flight calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn account_lines(&self, account: &AccountId) -> Result<Vec<TrustLine>, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self
            .delays
            .lock()
            .unwrap()
            .get(account)
            .copied()
            .or(self.default_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(account)
            .and_then(Script::next)
            .unwrap_or_else(|| Ok(Vec::new()));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }
}
