//! Invocation dispatch
//!
//! The host delivers a function name plus string arguments. They are resolved
//! once into an [`Invocation`] and executed; every outcome, including
//! failures, comes back as a [`Response`].

use crate::clock::Clock;
use crate::contract::AerialContract;
use aerial_core::{LedgerError, Result, StateStore};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Allocate { address: String, amount: u64 },
    MakePayment { from: String, to: String, amount: u64 },
    DeleteAccount { address: String },
    CheckBalance { address: String },
    MinePoS { address: String },
    CoinAge { address: String },
    TotalSupply,
}

impl Invocation {
    pub fn parse(function: &str, args: &[String]) -> Result<Self> {
        let invocation = match function {
            "Allocate" => {
                let [address, amount] = expect_args::<2>(function, args)?;
                Invocation::Allocate {
                    address: address.clone(),
                    amount: parse_amount(amount)?,
                }
            }
            "MakePayment" => {
                let [from, to, amount] = expect_args::<3>(function, args)?;
                Invocation::MakePayment {
                    from: from.clone(),
                    to: to.clone(),
                    amount: parse_amount(amount)?,
                }
            }
            "DeleteAccount" => {
                let [address] = expect_args::<1>(function, args)?;
                Invocation::DeleteAccount {
                    address: address.clone(),
                }
            }
            "CheckBalance" => {
                let [address] = expect_args::<1>(function, args)?;
                Invocation::CheckBalance {
                    address: address.clone(),
                }
            }
            "MinePoS" => {
                let [address] = expect_args::<1>(function, args)?;
                Invocation::MinePoS {
                    address: address.clone(),
                }
            }
            "CoinAge" => {
                let [address] = expect_args::<1>(function, args)?;
                Invocation::CoinAge {
                    address: address.clone(),
                }
            }
            "TotalSupply" => {
                expect_args::<0>(function, args)?;
                Invocation::TotalSupply
            }
            other => return Err(LedgerError::UnknownFunction(other.to_string())),
        };
        Ok(invocation)
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            Invocation::Allocate { .. } => "Allocate",
            Invocation::MakePayment { .. } => "MakePayment",
            Invocation::DeleteAccount { .. } => "DeleteAccount",
            Invocation::CheckBalance { .. } => "CheckBalance",
            Invocation::MinePoS { .. } => "MinePoS",
            Invocation::CoinAge { .. } => "CoinAge",
            Invocation::TotalSupply => "TotalSupply",
        }
    }
}

fn expect_args<'a, const N: usize>(
    function: &str,
    args: &'a [String],
) -> Result<&'a [String; N]> {
    args.try_into().map_err(|_| {
        LedgerError::validation(format!(
            "{} expects {} argument(s), got {}",
            function,
            N,
            args.len()
        ))
    })
}

fn parse_amount(value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| LedgerError::validation(format!("invalid amount: {:?}", value)))
}

/// Outcome of an invocation, with HTTP-style status codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub status: u16,
    pub message: String,
    pub payload: Option<Vec<u8>>,
}

impl Response {
    pub const OK: u16 = 200;

    pub fn success(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Self::OK,
            message: "OK".to_string(),
            payload,
        }
    }

    pub fn error(err: &LedgerError) -> Self {
        let status = match err {
            LedgerError::Validation(_) | LedgerError::UnknownFunction(_) => 400,
            LedgerError::NotFound(_) => 404,
            LedgerError::InsufficientFunds { .. }
            | LedgerError::IneligibleStake(_)
            | LedgerError::SupplyCapExceeded { .. }
            | LedgerError::BalanceOverflow { .. }
            | LedgerError::ArithmeticOverflow(_)
            | LedgerError::NotInitialized
            | LedgerError::AlreadyInitialized => 409,
            LedgerError::StateAccess(_) | LedgerError::Serialization(_) => 500,
        };
        Self {
            status,
            message: format!("{}: {}", err.kind(), err),
            payload: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Self::OK
    }

    pub fn payload_str(&self) -> Option<&str> {
        self.payload
            .as_deref()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }
}

impl<C: Clock> AerialContract<C> {
    /// Resolve and execute one host call
    pub fn invoke<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        function: &str,
        args: &[String],
    ) -> Response {
        match Invocation::parse(function, args) {
            Ok(invocation) => self.execute(store, &invocation),
            Err(e) => {
                log::warn!("rejected call to {}: {}", function, e);
                Response::error(&e)
            }
        }
    }

    pub fn execute<S: StateStore + ?Sized>(
        &self,
        store: &mut S,
        invocation: &Invocation,
    ) -> Response {
        log::debug!("executing {}", invocation.function_name());

        let result = match invocation {
            Invocation::Allocate { address, amount } => self
                .allocate(store, address, *amount)
                .map(|balance| Some(balance.to_string().into_bytes())),
            Invocation::MakePayment { from, to, amount } => {
                self.transfer(store, from, to, *amount).map(|_| None)
            }
            Invocation::DeleteAccount { address } => {
                self.delete_account(store, address).map(|_| None)
            }
            Invocation::CheckBalance { address } => self
                .balance(store, address)
                .map(|balance| Some(balance.to_string().into_bytes())),
            Invocation::MinePoS { address } => match self.mint(store, address) {
                Ok(_) => Ok(Some(b"true".to_vec())),
                // Ineligibility is a no-op, reported as `false` plus the reason
                Err(LedgerError::IneligibleStake(reason)) => {
                    return Response {
                        status: Response::OK,
                        message: reason.to_string(),
                        payload: Some(b"false".to_vec()),
                    };
                }
                // Refused by the cap: still a `false`, but reported as a conflict
                Err(e @ LedgerError::SupplyCapExceeded { .. }) => {
                    log::warn!("MinePoS failed: {}", e);
                    return Response {
                        payload: Some(b"false".to_vec()),
                        ..Response::error(&e)
                    };
                }
                Err(e) => Err(e),
            },
            Invocation::CoinAge { address } => self
                .coin_age(store, address)
                .map(|age| Some(age.value.to_string().into_bytes())),
            Invocation::TotalSupply => self
                .total_supply(store)
                .map(|supply| Some(supply.to_string().into_bytes())),
        };

        match result {
            Ok(payload) => Response::success(payload),
            Err(e) => {
                log::warn!("{} failed: {}", invocation.function_name(), e);
                Response::error(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_make_payment() {
        let invocation = Invocation::parse("MakePayment", &args(&["a", "b", "50"])).unwrap();
        assert_eq!(
            invocation,
            Invocation::MakePayment {
                from: "a".to_string(),
                to: "b".to_string(),
                amount: 50
            }
        );
    }

    #[test]
    fn test_parse_wrong_arity() {
        let err = Invocation::parse("CheckBalance", &args(&[])).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let err = Invocation::parse("TotalSupply", &args(&["x"])).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn test_parse_bad_amount() {
        let err = Invocation::parse("MakePayment", &args(&["a", "b", "-1"])).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn test_unknown_function() {
        let err = Invocation::parse("Selfdestruct", &args(&[])).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownFunction(_)));
        assert_eq!(Response::error(&err).status, 400);
    }

    #[test]
    fn test_error_response_message() {
        let response = Response::error(&LedgerError::NotFound("alice".to_string()));
        assert_eq!(response.status, 404);
        assert_eq!(response.message, "NotFoundError: Account not found: alice");
        assert!(!response.is_ok());
    }
}
