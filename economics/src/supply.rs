//! Supply management and tracking

use aerial_core::{ContractParameters, LedgerError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyStats {
    pub total_supply: u64,
    pub max_total_supply: u64,
    pub total_initial_supply: u64,
    pub initial_allocated: u64,
}

/// Enforces `total_supply <= max_total_supply` and bounds genesis allocations
#[derive(Debug, Clone)]
pub struct SupplyManager {
    stats: SupplyStats,
}

impl SupplyManager {
    pub fn from_params(params: &ContractParameters) -> Self {
        Self {
            stats: SupplyStats {
                total_supply: params.total_supply,
                max_total_supply: params.max_total_supply,
                total_initial_supply: params.total_initial_supply,
                initial_allocated: params.initial_allocated,
            },
        }
    }

    /// Add newly minted tokens, returning the new total supply
    pub fn mint(&mut self, amount: u64) -> Result<u64> {
        let new_supply = self
            .stats
            .total_supply
            .checked_add(amount)
            .filter(|supply| *supply <= self.stats.max_total_supply)
            .ok_or(LedgerError::SupplyCapExceeded {
                current: self.stats.total_supply,
                requested: amount,
                cap: self.stats.max_total_supply,
            })?;

        self.stats.total_supply = new_supply;
        Ok(new_supply)
    }

    /// Hand out part of the genesis supply, which is already counted in the total
    pub fn allocate(&mut self, amount: u64) -> Result<u64> {
        let allocated = self
            .stats
            .initial_allocated
            .checked_add(amount)
            .filter(|allocated| *allocated <= self.stats.total_initial_supply)
            .ok_or(LedgerError::SupplyCapExceeded {
                current: self.stats.initial_allocated,
                requested: amount,
                cap: self.stats.total_initial_supply,
            })?;

        self.stats.initial_allocated = allocated;
        Ok(allocated)
    }

    pub fn stats(&self) -> &SupplyStats {
        &self.stats
    }

    /// Write the tracked figures back into the parameters record
    pub fn apply_to(&self, params: &mut ContractParameters) {
        params.total_supply = self.stats.total_supply;
        params.initial_allocated = self.stats.initial_allocated;
    }
}
