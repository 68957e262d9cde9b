//! Run-level cancellation.
//!
//! A broadcast channel fans the cancel signal out to every in-flight
//! verification task; tasks `select!` on their receiver alongside the query.
//! A flag backs the channel so tasks spawned after cancellation still see it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;

/// Cloneable controller for cancelling a verification run.
#[derive(Clone)]
pub struct CancelHandle {
    tx: broadcast::Sender<()>,
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a receiver that will be notified on cancellation.
    ///
    /// Subscribe before checking [`is_cancelled`](Self::is_cancelled) to
    /// avoid missing a signal sent in between.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Cancel the run. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let _ = self.tx.send(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Wait for SIGINT/SIGTERM, then cancel.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { tracing::info!("received SIGINT, cancelling run"); }
            _ = terminate => { tracing::info!("received SIGTERM, cancelling run"); }
        }

        self.cancel();
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}
