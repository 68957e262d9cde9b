//! Verification run configuration.

use serde::Deserialize;
use thiserror::Error;

/// Tuning knobs for a verification run. Built once at startup, immutable
/// afterwards.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Upper bound on simultaneously in-flight account queries.
    pub max_concurrency: usize,
    /// Retry attempts per account on transient errors.
    pub max_retries: u32,
    /// First backoff delay; doubles per retry.
    pub backoff_base_ms: u64,
    /// Backoff ceiling.
    pub backoff_max_ms: u64,
    /// Deadline per account, covering retries and backoff sleeps.
    pub per_account_timeout_ms: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            max_retries: 3,
            backoff_base_ms: 250,
            backoff_max_ms: 5_000,
            per_account_timeout_ms: 30_000,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("backoff_base_ms must be at least 1")]
    ZeroBackoffBase,

    #[error("backoff_max_ms ({max}) must not be below backoff_base_ms ({base})")]
    BackoffCapBelowBase { base: u64, max: u64 },

    #[error("per_account_timeout_ms must be at least 1")]
    ZeroTimeout,
}

impl VerifyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.backoff_base_ms == 0 {
            return Err(ConfigError::ZeroBackoffBase);
        }
        if self.backoff_max_ms < self.backoff_base_ms {
            return Err(ConfigError::BackoffCapBelowBase {
                base: self.backoff_base_ms,
                max: self.backoff_max_ms,
            });
        }
        if self.per_account_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
