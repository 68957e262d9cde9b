//! Configuration resolution: CLI flags and environment variables override an
//! optional TOML file; everything is normalized and validated here, before
//! the verification core starts.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::path::PathBuf;
use trustscan_types::{AccountId, AssetRef};
use trustscan_verifier::VerifyConfig;

use crate::Cli;

/// Optional TOML file settings; every field can be overridden by a flag or
/// environment variable.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub url: Option<String>,
    pub issuer: Option<String>,
    pub currency: Option<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub verifier: VerifyConfig,
}

/// Fully resolved run settings.
#[derive(Debug)]
pub struct Settings {
    pub url: String,
    pub asset: AssetRef,
    pub input: PathBuf,
    pub output: PathBuf,
    pub verify: VerifyConfig,
}

impl Settings {
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                let parsed: FileConfig = toml::from_str(&contents)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?;
                tracing::info!("loaded config from {}", path.display());
                parsed
            }
            None => FileConfig::default(),
        };

        let url = cli
            .url
            .clone()
            .or(file.url)
            .context("missing websocket URL: set --url or XRPL_WEBSOCKET_URL")?;
        if !url.starts_with("ws://") && !url.starts_with("wss://") {
            bail!("websocket URL must start with ws:// or wss://, got {url:?}");
        }

        let issuer = cli
            .issuer
            .clone()
            .or(file.issuer)
            .context("missing token issuer: set --issuer or TOKEN_ISSUER")?;
        let issuer = normalize_issuer(&issuer);

        let currency = cli
            .currency
            .clone()
            .or(file.currency)
            .context("missing token currency: set --currency or TOKEN_CURRENCY")?;
        let currency = normalize_currency(&currency)?;

        let asset = AssetRef::new(AccountId::new(issuer), currency)
            .context("invalid target asset")?;

        let mut verify = file.verifier;
        if let Some(v) = cli.max_concurrency {
            verify.max_concurrency = v;
        }
        if let Some(v) = cli.max_retries {
            verify.max_retries = v;
        }
        if let Some(v) = cli.backoff_base_ms {
            verify.backoff_base_ms = v;
        }
        if let Some(v) = cli.backoff_max_ms {
            verify.backoff_max_ms = v;
        }
        if let Some(v) = cli.per_account_timeout_ms {
            verify.per_account_timeout_ms = v;
        }
        verify.validate().context("invalid verifier configuration")?;

        Ok(Self {
            url,
            asset,
            input: cli.input.clone().or(file.input).unwrap_or_else(|| "wallets.csv".into()),
            output: cli
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| "trustline_status.csv".into()),
            verify,
        })
    }
}

/// Issuer values may arrive in `prefix.address` form; only the final segment
/// is the on-ledger address.
pub fn normalize_issuer(raw: &str) -> String {
    raw.trim().rsplit('.').next().unwrap_or(raw).to_string()
}

/// Normalize a currency value to its exact on-ledger representation.
///
/// 3-character codes pass through as-is. 40-hex codes are uppercased (the
/// ledger's canonical form). Longer names (4–20 characters) are hex-encoded
/// and zero-padded to the 160-bit form. The core matches exact strings only,
/// so this is the one place conversion happens.
pub fn normalize_currency(raw: &str) -> anyhow::Result<String> {
    let code = raw.trim();
    if code.is_empty() {
        bail!("currency code is empty");
    }
    if code.len() == 3 {
        return Ok(code.to_string());
    }
    if code.len() == 40 && code.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(code.to_ascii_uppercase());
    }
    if code.len() <= 20 && code.is_ascii() {
        let mut encoded = hex::encode_upper(code.as_bytes());
        encoded.push_str(&"0".repeat(40 - encoded.len()));
        return Ok(encoded);
    }
    bail!("currency code {code:?} cannot be normalized: expected a 3-character code, a 40-hex-digit code, or an ASCII name of at most 20 characters");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_char_code_passes_through() {
        assert_eq!(normalize_currency("USD").unwrap(), "USD");
        assert_eq!(normalize_currency(" USD ").unwrap(), "USD");
    }

    #[test]
    fn forty_hex_is_uppercased() {
        let lower = "524c555344000000000000000000000000000000";
        assert_eq!(
            normalize_currency(lower).unwrap(),
            "524C555344000000000000000000000000000000"
        );
    }

    #[test]
    fn long_name_is_hex_encoded_and_padded() {
        assert_eq!(
            normalize_currency("RLUSD").unwrap(),
            "524C555344000000000000000000000000000000"
        );
    }

    #[test]
    fn empty_currency_rejected() {
        assert!(normalize_currency("  ").is_err());
    }

    #[test]
    fn oversized_name_rejected() {
        assert!(normalize_currency("a-name-longer-than-twenty-bytes").is_err());
    }

    #[test]
    fn issuer_keeps_segment_after_last_dot() {
        assert_eq!(normalize_issuer("token.rIssuer"), "rIssuer");
        assert_eq!(normalize_issuer("a.b.rIssuer"), "rIssuer");
        assert_eq!(normalize_issuer("rIssuer"), "rIssuer");
    }
}
