//! Time units and fixed protocol values

use crate::Timestamp;

/// One day in seconds
pub const ONE_DAY: Timestamp = 86_400;

/// One (non-leap) year in seconds
pub const ONE_YEAR: Timestamp = 365 * ONE_DAY;

/// Days used to annualize a day-granular coin age
pub const DAYS_PER_YEAR: u128 = 365;

/// Suffix hashed together with an address to locate its funding ledger
pub const LEDGER_KEY_SUFFIX: &str = "transferIn";

/// Label hashed to locate the contract parameters record
pub const PARAMS_KEY_LABEL: &str = "contractParameters";

/// Positional arguments expected by contract initialization
pub const INIT_ARG_COUNT: usize = 12;

/// Largest supported `decimals`; 10^30 still fits in a u128
pub const MAX_DECIMALS: u32 = 30;
