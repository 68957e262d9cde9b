//! Typed errors raised by ledger queries.

use thiserror::Error;
use trustscan_types::ErrorKind;

/// A failed ledger query, already classified for retry policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by server: {message}")]
    RateLimited {
        message: String,
        /// Server-provided retry hint, when the throttling response carried one.
        retry_after_ms: Option<u64>,
    },

    #[error("account not found on ledger: {0}")]
    AccountNotFound(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl LedgerError {
    /// The outcome taxonomy bucket this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::AccountNotFound(_) => ErrorKind::AccountNotFound,
            Self::Protocol(_) => ErrorKind::Protocol,
        }
    }

    /// Whether the verifier should retry this query.
    pub fn is_transient(&self) -> bool {
        self.kind().is_transient()
    }
}
