//! CSV collaborators around the verification core: the input provider that
//! reads the address list and the sink that writes the per-account report.

pub mod error;
pub mod input;
pub mod output;

pub use error::ReportError;
pub use input::load_accounts;
pub use output::{format_summary, write_results};
