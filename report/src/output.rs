//! Report sink: per-account CSV rows plus the human-readable summary.

use crate::error::ReportError;
use std::path::Path;
use tracing::info;
use trustscan_types::{Summary, VerificationOutcome, VerificationResult};

/// Write one row per account, in the order given (which the verifier
/// guarantees is input order): `address, outcome, limit, balance, error`.
/// Limit and balance are filled for found lines, the error detail for
/// errored accounts, and left empty otherwise.
pub fn write_results(
    path: impl AsRef<Path>,
    results: &[VerificationResult],
) -> Result<(), ReportError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["address", "outcome", "limit", "balance", "error"])?;

    for result in results {
        let (limit, balance, error) = match &result.outcome {
            VerificationOutcome::Found(line) => {
                (line.limit.as_str(), line.balance.as_str(), String::new())
            }
            VerificationOutcome::NotFound => ("", "", String::new()),
            VerificationOutcome::Error { kind, message } => ("", "", format!("{kind}: {message}")),
        };
        writer.write_record([
            result.account.as_str(),
            result.outcome.tag(),
            limit,
            balance,
            error.as_str(),
        ])?;
    }

    writer.flush()?;
    info!(count = results.len(), path = %path.display(), "results written");
    Ok(())
}

/// Render the final summary block printed at the end of a run.
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str("Final summary:\n");
    out.push_str(&format!("  accounts checked:    {}\n", summary.total));
    out.push_str(&format!("  trust line found:    {}\n", summary.found_count));
    out.push_str(&format!("  no trust line:       {}\n", summary.not_found_count));
    out.push_str(&format!("  errors:              {}\n", summary.error_count));

    if !summary.missing_accounts.is_empty() {
        out.push_str("\nAccounts missing the trust line:\n");
        for (index, account) in summary.missing_accounts.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", index + 1, account));
        }
    }
    out
}
