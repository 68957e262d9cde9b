//! Batch trust-line verification engine.
//!
//! [`BatchVerifier`] fans one verification task out per input account,
//! bounded by a concurrency gate, retries transient query failures with
//! jittered exponential backoff, and assembles per-account results back into
//! input order once every task has settled.

pub mod backoff;
pub mod batch;
pub mod cancel;
pub mod classify;
pub mod config;
pub mod progress;

pub use batch::{BatchReport, BatchVerifier};
pub use cancel::CancelHandle;
pub use classify::classify;
pub use config::{ConfigError, VerifyConfig};
pub use progress::{progress_channel, ProgressEvent, ProgressReceiver, ProgressSender};
