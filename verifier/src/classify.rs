//! Pure trust-line classification.

use tracing::warn;
use trustscan_types::{AssetRef, TrustLine, VerificationOutcome};

/// Decide whether the account's line set contains the target asset.
///
/// A line matches when its counterparty equals the target issuer and its
/// currency equals the target currency, by exact string comparison — no case
/// folding, no hex/ASCII conversion. Normalization happened when the
/// [`AssetRef`] was built.
///
/// The ledger's data model makes (account, counterparty, currency) unique, so
/// more than one match is an upstream anomaly: the first match wins and the
/// duplication is logged, not treated as fatal.
pub fn classify(lines: &[TrustLine], target: &AssetRef) -> VerificationOutcome {
    let mut matches = lines
        .iter()
        .filter(|line| line.counterparty == *target.issuer() && line.currency == target.currency());

    match matches.next() {
        None => VerificationOutcome::NotFound,
        Some(first) => {
            let extras = matches.count();
            if extras > 0 {
                warn!(
                    issuer = %target.issuer(),
                    currency = target.currency(),
                    extras,
                    "ledger returned duplicate trust lines for one (counterparty, currency) pair"
                );
            }
            VerificationOutcome::Found(first.clone())
        }
    }
}
