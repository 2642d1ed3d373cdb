//! Aerial Economics Module
//!
//! Implements the proof-of-stake economic model:
//! - Coin age accrued from an address's funding history
//! - Tiered interest schedule and mint reward calculation
//! - Supply cap bookkeeping

pub mod coin_age;
pub mod rewards;
pub mod supply;

pub use coin_age::{CoinAge, CoinAgeCalculator};
pub use rewards::{InterestTier, Reward, RewardCalculator};
pub use supply::{SupplyManager, SupplyStats};

/// Economic constants
pub mod constants {
    /// Interest multiplier during the first staking year, in percent (7.70x)
    pub const FIRST_YEAR_RATE_PERCENT: u128 = 770;

    /// Interest multiplier during the second staking year, in percent (4.35x)
    pub const SECOND_YEAR_RATE_PERCENT: u128 = 435;

    /// Base interest multiplier from the third year on, in percent (1x)
    pub const BASE_RATE_PERCENT: u128 = 100;
}
