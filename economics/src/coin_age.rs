//! Coin age calculation
//!
//! Coin age is stake weighted by holding time, measured in unit-days. An event
//! younger than the minimum stake age contributes nothing; an event older
//! than the maximum stake age contributes as if it were exactly that old.
//! The caller always supplies `as_of`, so the result is a pure function of
//! stored state.

use aerial_core::constants::ONE_DAY;
use aerial_core::{
    ContractParameters, FundingEvent, FundingLedger, IneligibleReason, LedgerError, Result,
    StateStore, Timestamp,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoinAge {
    /// Accumulated `amount * days` over the counted events
    pub value: u128,
    /// Events that reached the minimum stake age
    pub counted_events: usize,
    /// Events present in the ledger
    pub total_events: usize,
}

impl CoinAge {
    pub fn is_eligible(&self) -> bool {
        self.counted_events > 0
    }

    /// Reason a mint backed by this coin age would be refused, if any
    pub fn ineligible_reason(&self) -> Option<IneligibleReason> {
        if self.total_events == 0 {
            Some(IneligibleReason::NoFundingHistory)
        } else if self.counted_events == 0 {
            Some(IneligibleReason::StakeTooYoung)
        } else if self.value == 0 {
            Some(IneligibleReason::ZeroCoinAge)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinAgeCalculator {
    stake_min_age: Timestamp,
    stake_max_age: Timestamp,
}

impl CoinAgeCalculator {
    /// Ages are in seconds
    pub fn new(stake_min_age: Timestamp, stake_max_age: Timestamp) -> Self {
        Self {
            stake_min_age,
            stake_max_age,
        }
    }

    pub fn from_params(params: &ContractParameters) -> Self {
        Self::new(params.stake_min_age, params.stake_max_age)
    }

    pub fn compute(&self, events: &[FundingEvent], as_of: Timestamp) -> Result<CoinAge> {
        let mut coin_age = CoinAge {
            total_events: events.len(),
            ..CoinAge::default()
        };

        for event in events {
            let age = event.age_at(as_of);
            if age < self.stake_min_age {
                continue;
            }

            let days = (age.min(self.stake_max_age) / ONE_DAY) as u128;
            let contribution = (event.amount as u128)
                .checked_mul(days)
                .ok_or(LedgerError::ArithmeticOverflow("coin age"))?;
            coin_age.value = coin_age
                .value
                .checked_add(contribution)
                .ok_or(LedgerError::ArithmeticOverflow("coin age"))?;
            coin_age.counted_events += 1;
        }

        Ok(coin_age)
    }

    /// Coin age of `address` as of `as_of`, read from its funding ledger
    pub fn for_address<S: StateStore + ?Sized>(
        &self,
        store: &S,
        address: &str,
        as_of: Timestamp,
    ) -> Result<CoinAge> {
        let ledger = FundingLedger::load(store, address)?;
        self.compute(ledger.events(), as_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerial_core::MemoryStore;

    const T: Timestamp = 1_600_000_000;

    fn calculator() -> CoinAgeCalculator {
        CoinAgeCalculator::new(3 * ONE_DAY, 90 * ONE_DAY)
    }

    fn single_event() -> Vec<FundingEvent> {
        vec![FundingEvent::new("alice", 1000, T)]
    }

    #[test]
    fn test_below_min_age_is_ineligible() {
        let age = calculator().compute(&single_event(), T + ONE_DAY).unwrap();
        assert_eq!(age.value, 0);
        assert!(!age.is_eligible());
        assert_eq!(age.ineligible_reason(), Some(IneligibleReason::StakeTooYoung));
    }

    #[test]
    fn test_accrues_per_day() {
        let age = calculator().compute(&single_event(), T + 10 * ONE_DAY).unwrap();
        assert_eq!(age.value, 1000 * 10);
        assert!(age.is_eligible());
        assert_eq!(age.ineligible_reason(), None);
    }

    #[test]
    fn test_clamped_at_max_age() {
        let age = calculator().compute(&single_event(), T + 200 * ONE_DAY).unwrap();
        assert_eq!(age.value, 1000 * 90);
    }

    #[test]
    fn test_exactly_min_age_counts() {
        let age = calculator().compute(&single_event(), T + 3 * ONE_DAY).unwrap();
        assert_eq!(age.value, 3000);
    }

    #[test]
    fn test_partial_days_truncate() {
        let age = calculator().compute(&single_event(), T + 4 * ONE_DAY + ONE_DAY / 2).unwrap();
        assert_eq!(age.value, 4000);
    }

    #[test]
    fn test_mixed_history_skips_recent_events() {
        let events = vec![
            FundingEvent::new("alice", 1000, T),
            FundingEvent::new("alice", 500, T + 20 * ONE_DAY),
            FundingEvent::new("alice", 700, T + 29 * ONE_DAY),
        ];
        let age = calculator().compute(&events, T + 30 * ONE_DAY).unwrap();

        // 1000 * 30 + 500 * 10, the last event is one day old
        assert_eq!(age.value, 35_000);
        assert_eq!(age.counted_events, 2);
        assert_eq!(age.total_events, 3);
    }

    #[test]
    fn test_monotonic_until_max_age() {
        let calc = calculator();
        let events = single_event();
        let mut previous = 0;
        for day in 0..=120 {
            let value = calc.compute(&events, T + day * ONE_DAY).unwrap().value;
            assert!(value >= previous);
            if day >= 90 {
                assert_eq!(value, 90_000);
            }
            previous = value;
        }
    }

    #[test]
    fn test_empty_ledger_from_store() {
        let store = MemoryStore::new();
        let age = calculator().for_address(&store, "nobody", T).unwrap();
        assert_eq!(age.value, 0);
        assert_eq!(
            age.ineligible_reason(),
            Some(IneligibleReason::NoFundingHistory)
        );
    }
}
