//! Contract parameters
//!
//! Fixed at genesis and kept in the state store, never in process memory.
//! `total_supply` and `initial_allocated` are the only fields that change
//! after initialization.

use crate::constants::{INIT_ARG_COUNT, MAX_DECIMALS, ONE_DAY};
use crate::error::{LedgerError, Result};
use crate::keys::params_key;
use crate::state::StateStore;
use crate::Timestamp;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar form accepted for start times, e.g. `2018-Jan-02`
const DATE_FORMAT: &str = "%Y-%b-%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractParameters {
    pub name: String,
    pub symbol: String,
    /// Fixed-point fractional digits of the token
    pub decimals: u32,

    pub chain_start_time: Timestamp,
    pub chain_start_block: u64,
    /// Staking is disabled while this is zero
    pub stake_start_time: Timestamp,
    /// Minimum age, in seconds, before a funding event earns coin age
    pub stake_min_age: Timestamp,
    /// Age, in seconds, after which a funding event stops earning coin age
    pub stake_max_age: Timestamp,
    pub max_mint_proof_of_stake: u64,

    pub total_supply: u64,
    pub max_total_supply: u64,
    pub total_initial_supply: u64,
    /// Portion of `total_initial_supply` already handed out by genesis allocations
    #[serde(default)]
    pub initial_allocated: u64,
}

impl ContractParameters {
    /// Build parameters from the positional initialization arguments:
    ///
    /// `name, symbol, decimals, chain-start-time, stake-start-time,
    /// chain-start-block, stake-min-age-days, stake-max-age-days,
    /// max-mint-PoS, total-supply, max-total-supply, total-initial-supply`
    pub fn from_init_args(args: &[String]) -> Result<Self> {
        if args.len() < INIT_ARG_COUNT {
            return Err(LedgerError::validation(format!(
                "expected {} initialization arguments, got {}",
                INIT_ARG_COUNT,
                args.len()
            )));
        }

        let stake_min_age_days = parse_u64("stake-min-age-days", &args[6])?;
        let stake_max_age_days = parse_u64("stake-max-age-days", &args[7])?;

        let params = Self {
            name: args[0].trim().to_string(),
            symbol: args[1].trim().to_string(),
            decimals: parse_u64("decimals", &args[2])?
                .try_into()
                .map_err(|_| LedgerError::validation("decimals out of range"))?,
            chain_start_time: parse_timestamp("chain-start-time", &args[3])?,
            stake_start_time: parse_timestamp("stake-start-time", &args[4])?,
            chain_start_block: parse_u64("chain-start-block", &args[5])?,
            stake_min_age: days_to_seconds("stake-min-age-days", stake_min_age_days)?,
            stake_max_age: days_to_seconds("stake-max-age-days", stake_max_age_days)?,
            max_mint_proof_of_stake: parse_u64("max-mint-PoS", &args[8])?,
            total_supply: parse_u64("total-supply", &args[9])?,
            max_total_supply: parse_u64("max-total-supply", &args[10])?,
            total_initial_supply: parse_u64("total-initial-supply", &args[11])?,
            initial_allocated: 0,
        };

        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.symbol.is_empty() {
            return Err(LedgerError::validation("name and symbol must not be empty"));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(LedgerError::validation(format!(
                "decimals {} exceeds maximum {}",
                self.decimals, MAX_DECIMALS
            )));
        }
        if self.stake_min_age < 0 || self.stake_min_age > self.stake_max_age {
            return Err(LedgerError::validation(format!(
                "stake min age {}s must not exceed max age {}s",
                self.stake_min_age, self.stake_max_age
            )));
        }
        if self.total_supply > self.max_total_supply {
            return Err(LedgerError::validation(format!(
                "total supply {} exceeds max total supply {}",
                self.total_supply, self.max_total_supply
            )));
        }
        if self.total_initial_supply > self.total_supply {
            return Err(LedgerError::validation(format!(
                "initial supply {} exceeds total supply {}",
                self.total_initial_supply, self.total_supply
            )));
        }
        if self.initial_allocated > self.total_initial_supply {
            return Err(LedgerError::validation(
                "allocated initial supply exceeds total initial supply",
            ));
        }
        Ok(())
    }

    /// `10^decimals`
    pub fn decimal_scale(&self) -> Result<u128> {
        10u128
            .checked_pow(self.decimals)
            .ok_or(LedgerError::ArithmeticOverflow("decimal scale"))
    }

    /// Load the stored parameters, failing when the contract was never initialized
    pub fn load<S: StateStore + ?Sized>(store: &S) -> Result<Self> {
        Self::load_optional(store)?.ok_or(LedgerError::NotInitialized)
    }

    pub fn load_optional<S: StateStore + ?Sized>(store: &S) -> Result<Option<Self>> {
        match store.get(&params_key())? {
            Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
                LedgerError::Serialization(format!("Failed to decode contract parameters: {}", e))
            }),
            None => Ok(None),
        }
    }

    pub fn save<S: StateStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        let bytes = serde_json::to_vec(self).map_err(|e| {
            LedgerError::Serialization(format!("Failed to encode contract parameters: {}", e))
        })?;
        store.put(&params_key(), bytes)
    }
}

fn parse_u64(field: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        LedgerError::validation(format!(
            "{} must be an unsigned integer: {:?}",
            field, value
        ))
    })
}

fn days_to_seconds(field: &str, days: u64) -> Result<Timestamp> {
    Timestamp::try_from(days)
        .ok()
        .and_then(|d| d.checked_mul(ONE_DAY))
        .ok_or_else(|| LedgerError::validation(format!("{} is too large", field)))
}

/// Unix seconds, or a `YYYY-Mon-DD` date taken as midnight UTC
fn parse_timestamp(field: &str, value: &str) -> Result<Timestamp> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<Timestamp>() {
        return Ok(seconds);
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().timestamp())
        .ok_or_else(|| {
            LedgerError::validation(format!(
                "{} must be unix seconds or a YYYY-Mon-DD date: {:?}",
                field, value
            ))
        })
}
