//! Per-account verification outcomes.

use crate::account::AccountId;
use crate::line::TrustLine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a failed account query.
///
/// `Network` and `RateLimited` are transient (the verifier retries them);
/// the rest are terminal for the account's task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Connection, timeout, or transport failure.
    Network,
    /// The server signaled throttling.
    RateLimited,
    /// The address does not exist on the ledger (distinct from "has no
    /// trust lines").
    AccountNotFound,
    /// Malformed or unexpected response shape.
    Protocol,
    /// The per-account deadline elapsed, retries included.
    Timeout,
    /// The run was cancelled while this account was still in flight.
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::RateLimited => "rate_limited",
            Self::AccountNotFound => "account_not_found",
            Self::Protocol => "protocol",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the verifier should retry after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network | Self::RateLimited)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classified result of checking one account. Exactly one variant per
/// account per run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationOutcome {
    /// The account holds a trust line matching the target asset.
    Found(TrustLine),
    /// The account exists but holds no matching trust line.
    NotFound,
    /// The query failed terminally.
    Error { kind: ErrorKind, message: String },
}

impl VerificationOutcome {
    /// Stable tag used in reports and progress lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::NotFound => "not_found",
            Self::Error { .. } => "error",
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// NotFound and Error accounts both count as "missing" in the summary.
    pub fn is_missing(&self) -> bool {
        !self.is_found()
    }
}

/// One settled verification task. Created once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The input account, exactly as supplied at its input position.
    pub account: AccountId,
    pub outcome: VerificationOutcome,
    /// Wall time from task admission to settlement.
    pub query_duration_ms: u64,
    /// Retry attempts consumed (0 for first-try success).
    pub retries_used: u32,
}
