//! Nullable infrastructure for deterministic testing.
//!
//! The ledger endpoint is the one external dependency of the verification
//! engine, so this crate provides a scripted stand-in that:
//! - Returns programmed response sequences per account
//! - Records call counts and the concurrency high-water mark
//! - Can inject artificial latency, but never touches the network
//!
//! Usage: swap [`NullLedger`] for the real client in tests.

pub mod ledger;

pub use ledger::NullLedger;
