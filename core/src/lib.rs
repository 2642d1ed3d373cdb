//! Aerial Core Library
//!
//! Ledger primitives shared by the staking economics and the chaincode:
//! - State accessor trait with staged, all-or-nothing writes
//! - Derived state keys
//! - Balance and funding-ledger codecs
//! - Contract parameters

pub mod balance;
pub mod constants;
pub mod error;
pub mod keys;
pub mod ledger;
pub mod params;
pub mod state;

// Re-export main types
pub use error::{IneligibleReason, LedgerError, Result};
pub use ledger::{FundingEvent, FundingLedger};
pub use params::ContractParameters;
pub use state::{Changeset, MemoryStore, StagedState, StateStore};

/// Account identifier as supplied by the caller
pub type Address = String;

/// Seconds since the Unix epoch
pub type Timestamp = i64;
