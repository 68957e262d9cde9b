//! Ledger query client.
//!
//! One logical operation: list all trust lines for an account, walking the
//! ledger's pagination transparently. [`WsLedgerClient`] implements it over a
//! single multiplexed WebSocket connection.

pub mod error;
pub mod ledger;
pub mod protocol;
pub mod ws;

pub use error::LedgerError;
pub use ledger::LedgerClient;
pub use ws::WsLedgerClient;
