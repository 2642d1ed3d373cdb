//! Ledger error types

use std::fmt;
use thiserror::Error;

/// Why a mint was refused without being a hard failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    /// The address has no funding events at all
    NoFundingHistory,
    /// Every funding event is younger than the minimum stake age
    StakeTooYoung,
    /// Eligible events exist but their coin age rounds to zero
    ZeroCoinAge,
    /// `now` is not past the stake start time, or staking is disabled
    StakingNotStarted,
    /// The computed reward rounds to zero
    ZeroReward,
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            IneligibleReason::NoFundingHistory => "no funding history",
            IneligibleReason::StakeTooYoung => "no funding event has reached the minimum stake age",
            IneligibleReason::ZeroCoinAge => "coin age is zero",
            IneligibleReason::StakingNotStarted => "staking has not started",
            IneligibleReason::ZeroReward => "reward rounds to zero",
        };
        f.write_str(msg)
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Insufficient funds for {address}: requested {requested}, available {available}")]
    InsufficientFunds {
        address: String,
        requested: u64,
        available: u64,
    },

    #[error("Not eligible to mint: {0}")]
    IneligibleStake(IneligibleReason),

    #[error("Supply cap exceeded: {current} + {requested} > {cap}")]
    SupplyCapExceeded { current: u64, requested: u64, cap: u64 },

    #[error("Balance of {address} would exceed {ceiling}")]
    BalanceOverflow { address: String, ceiling: u64 },

    #[error("Arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),

    #[error("Contract not initialized")]
    NotInitialized,

    #[error("Contract already initialized")]
    AlreadyInitialized,

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("State access error: {0}")]
    StateAccess(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    /// Stable machine-readable kind, safe to surface to callers
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) | LedgerError::UnknownFunction(_) => "ValidationError",
            LedgerError::NotFound(_) => "NotFoundError",
            LedgerError::InsufficientFunds { .. } => "InsufficientFunds",
            LedgerError::IneligibleStake(_) => "IneligibleStake",
            LedgerError::SupplyCapExceeded { .. } => "SupplyCapExceeded",
            LedgerError::BalanceOverflow { .. } => "BalanceOverflow",
            LedgerError::ArithmeticOverflow(_) => "ArithmeticOverflow",
            LedgerError::NotInitialized => "NotInitialized",
            LedgerError::AlreadyInitialized => "AlreadyInitialized",
            LedgerError::StateAccess(_) | LedgerError::Serialization(_) => "StateAccessError",
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_stable() {
        assert_eq!(LedgerError::NotFound("a".into()).kind(), "NotFoundError");
        assert_eq!(
            LedgerError::UnknownFunction("Foo".into()).kind(),
            "ValidationError"
        );
        assert_eq!(
            LedgerError::Serialization("bad".into()).kind(),
            "StateAccessError"
        );
    }

    #[test]
    fn test_ineligible_message() {
        let err = LedgerError::IneligibleStake(IneligibleReason::NoFundingHistory);
        assert_eq!(err.to_string(), "Not eligible to mint: no funding history");
    }
}
