//! Address-list input provider.

use crate::error::ReportError;
use std::path::Path;
use tracing::info;
use trustscan_types::AccountId;

/// Load account addresses from a CSV file with an `address` column.
///
/// Fields are trimmed and blank rows skipped. Malformed addresses are
/// rejected here, with their row number, so the verification core only ever
/// sees well-formed address strings. An input that yields zero addresses is
/// an error, matching the run-level setup failure policy.
pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<AccountId>, ReportError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| ReportError::Unreadable(path.to_path_buf(), e))?;

    let address_column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == "address")
        .ok_or(ReportError::MissingAddressColumn)?;

    let mut accounts = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let raw = record.get(address_column).unwrap_or("").trim();
        if raw.is_empty() {
            continue;
        }
        let account = AccountId::new(raw);
        if !account.is_wellformed() {
            return Err(ReportError::MalformedAddress {
                // +2: one for the header row, one for 1-based numbering.
                row: index + 2,
                address: raw.to_string(),
            });
        }
        accounts.push(account);
    }

    if accounts.is_empty() {
        return Err(ReportError::EmptyInput);
    }

    info!(count = accounts.len(), path = %path.display(), "loaded account addresses");
    Ok(accounts)
}
