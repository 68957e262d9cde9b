//! The (issuer, currency) pair identifying which asset's trust lines are
//! being checked.

use crate::account::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from constructing an [`AssetRef`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("issuer address is empty")]
    EmptyIssuer,

    #[error("currency code is empty")]
    EmptyCurrency,

    #[error("currency code {0:?} is neither a 3-character code nor a 40-hex-digit code")]
    BadCurrency(String),
}

/// The target asset: issuer account plus the exact on-ledger currency code.
///
/// The currency is stored as supplied — either a 3-character code or a
/// normalized 40-hex-digit code. The two representations are never converted
/// here; normalization is the configuration layer's job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    issuer: AccountId,
    currency: String,
}

impl AssetRef {
    /// Build an asset reference, validating the currency encoding.
    pub fn new(issuer: AccountId, currency: impl Into<String>) -> Result<Self, AssetError> {
        if issuer.as_str().is_empty() {
            return Err(AssetError::EmptyIssuer);
        }
        let currency = currency.into();
        if currency.is_empty() {
            return Err(AssetError::EmptyCurrency);
        }
        if !is_valid_currency(&currency) {
            return Err(AssetError::BadCurrency(currency));
        }
        Ok(Self { issuer, currency })
    }

    pub fn issuer(&self) -> &AccountId {
        &self.issuer
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.currency, self.issuer)
    }
}

/// A currency code is valid when it is a 3-character printable ASCII code or
/// a 40-digit hexadecimal code (the ledger's 160-bit form).
fn is_valid_currency(code: &str) -> bool {
    match code.len() {
        3 => code.chars().all(|c| c.is_ascii_graphic()),
        40 => code.chars().all(|c| c.is_ascii_hexdigit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> AccountId {
        AccountId::new("rN7n7otQDd6FczFgLdSqtcsAUxDkw6fzRH")
    }

    #[test]
    fn three_char_code_accepted() {
        let asset = AssetRef::new(issuer(), "USD").unwrap();
        assert_eq!(asset.currency(), "USD");
        assert_eq!(asset.issuer(), &issuer());
    }

    #[test]
    fn forty_hex_code_accepted() {
        let code = "524C555344000000000000000000000000000000";
        let asset = AssetRef::new(issuer(), code).unwrap();
        assert_eq!(asset.currency(), code);
    }

    #[test]
    fn empty_currency_rejected() {
        assert_eq!(
            AssetRef::new(issuer(), "").unwrap_err(),
            AssetError::EmptyCurrency
        );
    }

    #[test]
    fn empty_issuer_rejected() {
        assert_eq!(
            AssetRef::new(AccountId::new(""), "USD").unwrap_err(),
            AssetError::EmptyIssuer
        );
    }

    #[test]
    fn odd_length_code_rejected() {
        assert!(matches!(
            AssetRef::new(issuer(), "USDT").unwrap_err(),
            AssetError::BadCurrency(_)
        ));
    }

    #[test]
    fn non_hex_forty_char_code_rejected() {
        let code = "ZZ4C555344000000000000000000000000000000";
        assert!(matches!(
            AssetRef::new(issuer(), code).unwrap_err(),
            AssetError::BadCurrency(_)
        ));
    }
}
