//! Ledger account address type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque ledger account address.
///
/// The core treats addresses as exact strings; validation happens at the
/// input boundary before addresses reach the verifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account id from a raw address string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shape check used by the input provider: classic ledger addresses
    /// start with `r` and run 25–35 base58 characters (no `0`, `O`, `I`, `l`).
    pub fn is_wellformed(&self) -> bool {
        let s = &self.0;
        if !s.starts_with('r') || s.len() < 25 || s.len() > 35 {
            return false;
        }
        s.chars()
            .all(|c| c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l'))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
