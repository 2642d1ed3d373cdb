//! Aerial Chaincode
//!
//! Proof-of-stake token contract executed by a deterministic host runtime.
//! Each invocation runs against the host's key-value store and either
//! commits all of its writes or none of them.

pub mod clock;
pub mod contract;
pub mod invocation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use contract::{AerialContract, MintReceipt, TransferReceipt};
pub use invocation::{Invocation, Response};
