//! Funding ledger
//!
//! Per-address, append-only history of funding events. Each event marks
//! principal that starts accruing coin age at `time`. The whole history is
//! stored as one JSON array under [`funding_ledger_key`].

use crate::error::{LedgerError, Result};
use crate::keys::{display_key, funding_ledger_key};
use crate::state::StateStore;
use crate::{Address, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingEvent {
    #[serde(alias = "Address")]
    pub address: Address,
    #[serde(alias = "Amount")]
    pub amount: u64,
    /// Seconds since the Unix epoch
    #[serde(alias = "Time")]
    pub time: Timestamp,
}

impl FundingEvent {
    pub fn new(address: impl Into<Address>, amount: u64, time: Timestamp) -> Self {
        Self {
            address: address.into(),
            amount,
            time,
        }
    }

    /// Seconds elapsed between the event and `as_of`, zero for future events
    pub fn age_at(&self, as_of: Timestamp) -> Timestamp {
        as_of.saturating_sub(self.time).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingLedger {
    address: Address,
    events: Vec<FundingEvent>,
}

impl FundingLedger {
    pub fn new(address: impl Into<Address>) -> Self {
        Self {
            address: address.into(),
            events: Vec::new(),
        }
    }

    /// Load the ledger for `address`.
    ///
    /// A missing or unreadable record yields an empty ledger: an address
    /// without usable history simply has no coin age. Store failures still
    /// propagate.
    pub fn load<S: StateStore + ?Sized>(store: &S, address: &str) -> Result<Self> {
        let key = funding_ledger_key(address);
        let events = match store.get(&key)? {
            Some(bytes) => match serde_json::from_slice::<Vec<FundingEvent>>(&bytes) {
                Ok(events) => events,
                Err(e) => {
                    log::warn!(
                        "ignoring malformed funding ledger {} for {}: {}",
                        display_key(&key),
                        address,
                        e
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self {
            address: address.to_string(),
            events,
        })
    }

    pub fn save<S: StateStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        let bytes = serde_json::to_vec(&self.events)
            .map_err(|e| LedgerError::Serialization(format!("Failed to encode ledger: {}", e)))?;
        store.put(&funding_ledger_key(&self.address), bytes)
    }

    /// Remove the stored record for `address`
    pub fn remove<S: StateStore + ?Sized>(store: &mut S, address: &str) -> Result<()> {
        store.delete(&funding_ledger_key(address))
    }

    /// Append an event; timestamps never go backwards within one ledger
    pub fn append(&mut self, amount: u64, time: Timestamp) -> Result<FundingEvent> {
        if let Some(last) = self.events.last() {
            if time < last.time {
                return Err(LedgerError::validation(format!(
                    "funding event at {} predates last event at {}",
                    time, last.time
                )));
            }
        }
        let event = FundingEvent::new(self.address.clone(), amount, time);
        self.events.push(event.clone());
        Ok(event)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn events(&self) -> &[FundingEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;

    #[test]
    fn test_missing_ledger_is_empty() {
        let store = MemoryStore::new();
        let ledger = FundingLedger::load(&store, "alice").unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.address(), "alice");
    }

    #[test]
    fn test_malformed_ledger_is_empty() {
        let mut store = MemoryStore::new();
        store
            .put(&funding_ledger_key("alice"), b"not json".to_vec())
            .unwrap();

        let ledger = FundingLedger::load(&store, "alice").unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_append_preserves_history() {
        let mut store = MemoryStore::new();
        let mut ledger = FundingLedger::new("alice");
        ledger.append(1000, 100).unwrap();
        ledger.save(&mut store).unwrap();

        let mut ledger = FundingLedger::load(&store, "alice").unwrap();
        ledger.append(1100, 200).unwrap();
        ledger.save(&mut store).unwrap();

        let ledger = FundingLedger::load(&store, "alice").unwrap();
        assert_eq!(
            ledger.events(),
            &[
                FundingEvent::new("alice", 1000, 100),
                FundingEvent::new("alice", 1100, 200),
            ]
        );
    }

    #[test]
    fn test_backdated_append_rejected() {
        let mut ledger = FundingLedger::new("alice");
        ledger.append(10, 500).unwrap();

        let err = ledger.append(10, 499).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_field_names_are_preserved() {
        let mut store = MemoryStore::new();
        let mut ledger = FundingLedger::new("alice");
        ledger.append(7, 42).unwrap();
        ledger.save(&mut store).unwrap();

        let raw = store.get(&funding_ledger_key("alice")).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json[0]["address"], "alice");
        assert_eq!(json[0]["amount"], 7);
        assert_eq!(json[0]["time"], 42);
    }

    #[test]
    fn test_reads_capitalized_records() {
        let mut store = MemoryStore::new();
        store
            .put(
                &funding_ledger_key("alice"),
                br#"[{"Address":"alice","Amount":5,"Time":9}]"#.to_vec(),
            )
            .unwrap();

        let ledger = FundingLedger::load(&store, "alice").unwrap();
        assert_eq!(ledger.events(), &[FundingEvent::new("alice", 5, 9)]);
    }
}
