use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("input file {0} not found or unreadable: {1}")]
    Unreadable(PathBuf, #[source] csv::Error),

    #[error("input file must have a column named \"address\"")]
    MissingAddressColumn,

    #[error("row {row}: malformed address {address:?}")]
    MalformedAddress { row: usize, address: String },

    #[error("no account addresses found in input file")]
    EmptyInput,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
