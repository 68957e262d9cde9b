//! Core types for trustscan.
//!
//! This crate defines the data model shared by every other crate in the
//! workspace: account addresses, the target asset reference, trust-line
//! snapshots, verification outcomes, and the run summary.

pub mod account;
pub mod asset;
pub mod line;
pub mod outcome;
pub mod summary;

pub use account::AccountId;
pub use asset::{AssetError, AssetRef};
pub use line::TrustLine;
pub use outcome::{ErrorKind, VerificationOutcome, VerificationResult};
pub use summary::Summary;
