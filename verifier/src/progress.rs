//! Per-account settlement notifications.

use tokio::sync::mpsc;
use trustscan_types::AccountId;

/// Emitted once when an account's verification task settles. Notification
/// only — nothing reads back from the observer.
#[derive(Clone, Debug)]
pub struct ProgressEvent {
    pub account: AccountId,
    /// `"found"`, `"not_found"`, or `"error"`.
    pub outcome_tag: &'static str,
    /// How many accounts have settled so far, this one included.
    pub completed: usize,
    pub total: usize,
}

pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Create a progress channel pair.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}
