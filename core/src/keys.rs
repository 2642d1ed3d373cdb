//! Derived state keys
//!
//! Balances live under the raw address. Everything else lives under a
//! SHA-256 digest so it cannot collide with an address-shaped key.

use crate::constants::{LEDGER_KEY_SUFFIX, PARAMS_KEY_LABEL};
use sha2::{Digest, Sha256};

/// Hash the concatenation of `parts` into a fixed-length key
pub fn derive_key(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

pub fn balance_key(address: &str) -> Vec<u8> {
    address.as_bytes().to_vec()
}

/// `sha256(address ++ "transferIn")`
pub fn funding_ledger_key(address: &str) -> Vec<u8> {
    derive_key(&[address.as_bytes(), LEDGER_KEY_SUFFIX.as_bytes()])
}

pub fn params_key() -> Vec<u8> {
    derive_key(&[PARAMS_KEY_LABEL.as_bytes()])
}

/// Hex rendering for logs and diagnostics
pub fn display_key(key: &[u8]) -> String {
    hex::encode(key)
}
