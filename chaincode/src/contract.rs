//! Contract operations
//!
//! Every operation loads what it needs from the store, validates and computes
//! everything against a [`StagedState`], and commits only once nothing can
//! fail any more.

use crate::clock::{Clock, SystemClock};
use aerial_core::balance::{delete_balance, read_balance, write_balance};
use aerial_core::{
    ContractParameters, FundingLedger, IneligibleReason, LedgerError, Result, StagedState,
    StateStore, Timestamp,
};
use aerial_economics::{CoinAge, CoinAgeCalculator, InterestTier, RewardCalculator, SupplyManager};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReceipt {
    pub from: String,
    pub to: String,
    pub amount: u64,
    pub from_balance: u64,
    pub to_balance: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintReceipt {
    pub address: String,
    pub coin_age: u128,
    pub tier: InterestTier,
    pub reward: u64,
    pub new_balance: u64,
    pub total_supply: u64,
    pub minted_at: Timestamp,
}

pub struct AerialContract<C: Clock = SystemClock> {
    clock: C,
}

impl Default for AerialContract<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> AerialContract<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Genesis: parse and store the contract parameters.
    pub fn init<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        args: &[String],
    ) -> Result<ContractParameters> {
        log::info!("initializing contract with {} argument(s)", args.len());

        let params = ContractParameters::from_init_args(args)?;
        if ContractParameters::load_optional(store)?.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }

        let mut staged = StagedState::new(store);
        params.save(&mut staged)?;
        staged.commit()?;

        log::info!(
            "initialized {} ({}) total supply {} / {}",
            params.name,
            params.symbol,
            params.total_supply,
            params.max_total_supply
        );
        Ok(params)
    }

    /// Hand part of the genesis supply to `address` and start its coin age.
    pub fn allocate<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        address: &str,
        amount: u64,
    ) -> Result<u64> {
        validate_address(address)?;
        validate_amount(amount)?;
        let now = self.clock.now();

        let mut staged = StagedState::new(store);
        let mut params = ContractParameters::load(&staged)?;

        let mut supply = SupplyManager::from_params(&params);
        supply.allocate(amount)?;

        let balance = read_balance(&staged, address)?.unwrap_or(0);
        let new_balance = credit(balance, amount, address, params.max_total_supply)?;

        // Only the allocated principal starts accruing, not tokens already held
        let mut ledger = FundingLedger::load(&staged, address)?;
        ledger.append(amount, now)?;

        supply.apply_to(&mut params);
        write_balance(&mut staged, address, new_balance)?;
        ledger.save(&mut staged)?;
        params.save(&mut staged)?;
        staged.commit()?;

        log::info!(
            "allocated {} to {} ({} of {} initial supply allocated)",
            amount,
            address,
            params.initial_allocated,
            params.total_initial_supply
        );
        Ok(new_balance)
    }

    /// Move `amount` from `from` to `to`.
    pub fn transfer<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        from: &str,
        to: &str,
        amount: u64,
    ) -> Result<TransferReceipt> {
        validate_address(from)?;
        validate_address(to)?;
        validate_amount(amount)?;
        if from == to {
            return Err(LedgerError::validation("cannot transfer to the same account"));
        }

        let mut staged = StagedState::new(store);
        let params = ContractParameters::load(&staged)?;

        // A missing source record is an empty account
        let from_balance = read_balance(&staged, from)?.unwrap_or(0);
        if from_balance < amount {
            log::warn!(
                "rejected payment of {} from {}: balance {}",
                amount,
                from,
                from_balance
            );
            return Err(LedgerError::InsufficientFunds {
                address: from.to_string(),
                requested: amount,
                available: from_balance,
            });
        }

        let to_balance = read_balance(&staged, to)?.unwrap_or(0);
        let to_balance = credit(to_balance, amount, to, params.max_total_supply)?;
        let from_balance = from_balance - amount;

        write_balance(&mut staged, from, from_balance)?;
        write_balance(&mut staged, to, to_balance)?;
        staged.commit()?;

        log::info!(
            "payment of {} from {} to {}: balances {} / {}",
            amount,
            from,
            to,
            from_balance,
            to_balance
        );
        Ok(TransferReceipt {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            from_balance,
            to_balance,
        })
    }

    /// Mint the proof-of-stake reward earned by `address`.
    ///
    /// Returns [`LedgerError::IneligibleStake`] without touching state when
    /// the address has nothing to claim.
    pub fn mint<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        address: &str,
    ) -> Result<MintReceipt> {
        validate_address(address)?;
        let now = self.clock.now();

        let mut staged = StagedState::new(store);
        let mut params = ContractParameters::load(&staged)?;
        let mut ledger = FundingLedger::load(&staged, address)?;

        let rewards = RewardCalculator::from_params(&params)?;
        let reject = |reason: IneligibleReason| {
            log::info!("{} not eligible to mint: {}", address, reason);
            Err(LedgerError::IneligibleStake(reason))
        };

        if ledger.is_empty() {
            return reject(IneligibleReason::NoFundingHistory);
        }
        if !rewards.is_staking_active(now) {
            return reject(IneligibleReason::StakingNotStarted);
        }

        let coin_age = CoinAgeCalculator::from_params(&params).compute(ledger.events(), now)?;
        if let Some(reason) = coin_age.ineligible_reason() {
            return reject(reason);
        }

        let reward = rewards.compute(coin_age.value, now)?;
        let tier = match reward.tier {
            Some(tier) if reward.amount > 0 => tier,
            Some(_) => return reject(IneligibleReason::ZeroReward),
            None => return reject(IneligibleReason::StakingNotStarted),
        };

        let mut supply = SupplyManager::from_params(&params);
        let total_supply = supply.mint(reward.amount).map_err(|e| {
            log::warn!("mint of {} for {} rejected: {}", reward.amount, address, e);
            e
        })?;

        let balance = read_balance(&staged, address)?.unwrap_or(0);
        let new_balance = balance
            .checked_add(reward.amount)
            .ok_or(LedgerError::ArithmeticOverflow("balance"))?;

        // The new event carries the full post-mint balance as principal
        ledger.append(new_balance, now)?;
        supply.apply_to(&mut params);

        write_balance(&mut staged, address, new_balance)?;
        ledger.save(&mut staged)?;
        params.save(&mut staged)?;
        staged.commit()?;

        log::info!(
            "minted {} for {} (coin age {}, {:?}): balance {}, total supply {}",
            reward.amount,
            address,
            coin_age.value,
            tier,
            new_balance,
            total_supply
        );
        Ok(MintReceipt {
            address: address.to_string(),
            coin_age: coin_age.value,
            tier,
            reward: reward.amount,
            new_balance,
            total_supply,
            minted_at: now,
        })
    }

    pub fn balance<S: StateStore + ?Sized>(&self, store: &S, address: &str) -> Result<u64> {
        validate_address(address)?;
        read_balance(store, address)?.ok_or_else(|| LedgerError::NotFound(address.to_string()))
    }

    /// Coin age of `address` at the current time
    pub fn coin_age<S: StateStore + ?Sized>(&self, store: &S, address: &str) -> Result<CoinAge> {
        validate_address(address)?;
        let params = ContractParameters::load(store)?;
        CoinAgeCalculator::from_params(&params).for_address(store, address, self.clock.now())
    }

    pub fn total_supply<S: StateStore + ?Sized>(&self, store: &S) -> Result<u64> {
        Ok(ContractParameters::load(store)?.total_supply)
    }

    /// Remove an account's balance together with its funding ledger.
    pub fn delete_account<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        address: &str,
    ) -> Result<()> {
        validate_address(address)?;

        let mut staged = StagedState::new(store);
        ContractParameters::load(&staged)?;
        if read_balance(&staged, address)?.is_none() {
            return Err(LedgerError::NotFound(address.to_string()));
        }

        delete_balance(&mut staged, address)?;
        FundingLedger::remove(&mut staged, address)?;
        staged.commit()?;

        log::info!("deleted account {}", address);
        Ok(())
    }
}

fn validate_address(address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(LedgerError::validation("address must not be empty"));
    }
    Ok(())
}

fn validate_amount(amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(LedgerError::validation("amount must be greater than zero"));
    }
    Ok(())
}

/// Credit `amount`, refusing to push one account past the supply ceiling
fn credit(balance: u64, amount: u64, address: &str, ceiling: u64) -> Result<u64> {
    balance
        .checked_add(amount)
        .filter(|total| *total <= ceiling)
        .ok_or_else(|| LedgerError::BalanceOverflow {
            address: address.to_string(),
            ceiling,
        })
}
