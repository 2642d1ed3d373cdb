//! Account balance codec
//!
//! Balances are stored as decimal ASCII under the raw address.

use crate::error::{LedgerError, Result};
use crate::keys::balance_key;
use crate::state::StateStore;

pub fn encode_balance(balance: u64) -> Vec<u8> {
    balance.to_string().into_bytes()
}

pub fn decode_balance(address: &str, bytes: &[u8]) -> Result<u64> {
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .ok_or_else(|| {
            LedgerError::Serialization(format!("Malformed balance record for {}", address))
        })
}

/// Balance record for `address`, `None` when the account has never been credited
pub fn read_balance<S: StateStore + ?Sized>(store: &S, address: &str) -> Result<Option<u64>> {
    match store.get(&balance_key(address))? {
        Some(bytes) => decode_balance(address, &bytes).map(Some),
        None => Ok(None),
    }
}

pub fn write_balance<S: StateStore + ?Sized>(
    store: &mut S,
    address: &str,
    balance: u64,
) -> Result<()> {
    store.put(&balance_key(address), encode_balance(balance))
}

pub fn delete_balance<S: StateStore + ?Sized>(store: &mut S, address: &str) -> Result<()> {
    store.delete(&balance_key(address))
}
