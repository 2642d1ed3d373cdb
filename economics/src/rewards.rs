//! Proof-of-stake reward calculation
//!
//! `reward = coin_age * rate / (365 * 10^decimals)`, where the rate is
//! `max_mint_proof_of_stake` scaled by the interest tier of the current
//! staking year. The product is taken in 256 bits so the floored quotient is
//! exact whenever it fits in a u64.

use crate::constants::{BASE_RATE_PERCENT, FIRST_YEAR_RATE_PERCENT, SECOND_YEAR_RATE_PERCENT};
use aerial_core::constants::{DAYS_PER_YEAR, ONE_YEAR};
use aerial_core::{ContractParameters, LedgerError, Result, Timestamp};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestTier {
    FirstYear,
    SecondYear,
    Base,
}

impl InterestTier {
    /// Tier for the number of seconds elapsed since staking started
    pub fn for_elapsed(elapsed: Timestamp) -> Self {
        match elapsed / ONE_YEAR {
            0 => InterestTier::FirstYear,
            1 => InterestTier::SecondYear,
            _ => InterestTier::Base,
        }
    }

    pub fn rate_percent(&self) -> u128 {
        match self {
            InterestTier::FirstYear => FIRST_YEAR_RATE_PERCENT,
            InterestTier::SecondYear => SECOND_YEAR_RATE_PERCENT,
            InterestTier::Base => BASE_RATE_PERCENT,
        }
    }

    /// Interest rate for this tier given the configured base mint rate
    pub fn rate(&self, max_mint_proof_of_stake: u64) -> u128 {
        // u64 * 770 cannot overflow u128
        max_mint_proof_of_stake as u128 * self.rate_percent() / 100
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub amount: u64,
    /// `None` when staking is not possible at all
    pub tier: Option<InterestTier>,
}

impl Reward {
    fn ineligible() -> Self {
        Self {
            amount: 0,
            tier: None,
        }
    }

    /// False means "not yet stakeable", as opposed to a reward that rounds to zero
    pub fn is_eligible(&self) -> bool {
        self.tier.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardCalculator {
    stake_start_time: Timestamp,
    max_mint_proof_of_stake: u64,
    decimal_scale: u128,
}

impl RewardCalculator {
    pub fn new(
        stake_start_time: Timestamp,
        max_mint_proof_of_stake: u64,
        decimal_scale: u128,
    ) -> Self {
        Self {
            stake_start_time,
            max_mint_proof_of_stake,
            decimal_scale,
        }
    }

    pub fn from_params(params: &ContractParameters) -> Result<Self> {
        Ok(Self::new(
            params.stake_start_time,
            params.max_mint_proof_of_stake,
            params.decimal_scale()?,
        ))
    }

    pub fn is_staking_active(&self, now: Timestamp) -> bool {
        self.stake_start_time > 0 && now > self.stake_start_time
    }

    pub fn compute(&self, coin_age: u128, now: Timestamp) -> Result<Reward> {
        if !self.is_staking_active(now) || coin_age == 0 {
            return Ok(Reward::ineligible());
        }

        let tier = InterestTier::for_elapsed(now - self.stake_start_time);
        let rate = tier.rate(self.max_mint_proof_of_stake);
        let divisor = DAYS_PER_YEAR
            .checked_mul(self.decimal_scale)
            .ok_or(LedgerError::ArithmeticOverflow("reward divisor"))?;

        let amount = U256::from(coin_age)
            .checked_mul(U256::from(rate))
            .ok_or(LedgerError::ArithmeticOverflow("reward"))?
            / U256::from(divisor);
        if amount > U256::from(u64::MAX) {
            return Err(LedgerError::ArithmeticOverflow("reward"));
        }
        let amount = amount.low_u64();

        log::debug!(
            "coin age {} at {:?} rate {} -> reward {}",
            coin_age,
            tier,
            rate,
            amount
        );

        Ok(Reward {
            amount,
            tier: Some(tier),
        })
    }
}
