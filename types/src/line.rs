//! Trust-line snapshot as returned by the ledger.

use crate::account::AccountId;
use serde::{Deserialize, Serialize};

/// One trust line of the queried account, in account-relative form: balance
/// and limit are expressed from the queried account's perspective, as decimal
/// strings exactly as the ledger returned them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLine {
    /// The account on the other end of the line.
    pub counterparty: AccountId,
    /// On-ledger currency code (3-character or 40-hex form).
    pub currency: String,
    /// The queried account's limit toward the counterparty.
    pub limit: String,
    /// Current balance on the line.
    pub balance: String,
}

impl TrustLine {
    pub fn new(
        counterparty: impl Into<AccountId>,
        currency: impl Into<String>,
        limit: impl Into<String>,
        balance: impl Into<String>,
    ) -> Self {
        Self {
            counterparty: counterparty.into(),
            currency: currency.into(),
            limit: limit.into(),
            balance: balance.into(),
        }
    }
}
