//! The ledger-query abstraction the verifier runs against.

use crate::error::LedgerError;
use async_trait::async_trait;
use trustscan_types::{AccountId, TrustLine};

/// Narrow interface over a remote ledger-query endpoint.
///
/// `account_lines` materializes the account's complete trust-line set, in the
/// ledger's returned order, walking every pagination page before returning.
/// A page failure mid-walk fails the whole call: an `Ok` with an empty vec
/// always means "the account has zero trust lines", never "pagination
/// aborted".
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn account_lines(&self, account: &AccountId) -> Result<Vec<TrustLine>, LedgerError>;
}
