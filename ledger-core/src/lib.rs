//! BRB reflection ledger.
//!
//! A fungible-token ledger with automatic, claim-free redistribution to
//! holders ("reflection"), transfer taxation, anti-whale limits, automated
//! conversion of collected tax into base asset ("swap-back") and a
//! burn-for-reward mechanism ("burn-to-earn").
//!
//! ## Components
//!
//! | Component        | Module             | Role                                           |
//! |------------------|--------------------|------------------------------------------------|
//! | Ledger           | [`ledger`]         | Base balances, supply, `R` and `S` aggregates  |
//! | Limit guard      | [`limits`]         | Per-transaction and per-wallet caps            |
//! | Fee engine       | [`fee_schedule`]   | Classification, fee split, tax attribution     |
//! | Swap-back        | [`swap_back`]      | Tax → base asset through the AMM               |
//! | Burn-to-earn     | [`burn`]           | Token burns rewarded from a base-asset reserve |
//!
//! [`ReflectionToken`] wires them together. Every mutating call takes an
//! [`OpContext`] (caller and time) and the [`AccessPolicy`] that decides who
//! may do what and which accounts are exempt.
//!
//! ## Balances
//!
//! Ledger units are never rewritten by reflection. A holder's reported
//! balance is derived on read:
//!
//! ```text
//! effective = 2·base − ⌊base·S / (100·R + S)⌋     (non-pair accounts)
//! effective = base                                 (liquidity pairs)
//! ```

pub mod address;
pub mod base_asset;
pub mod burn;
pub mod exchange;
pub mod fee_schedule;
pub mod ledger;
pub mod limits;
pub mod policy;
pub mod pool;
pub mod reflection;
pub mod swap_back;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

mod error;
mod token;

pub use address::{Address, AddressParseError, ADDRESS_LEN};
pub use base_asset::BaseAssetBook;
pub use burn::{BurnReceipt, BurnToEarnConfig, BurnToEarnEngine, BurnToEarnInfo, BurnToEarnState};
pub use error::{ExchangeError, LedgerError};
pub use exchange::{Exchange, PoolReserves};
pub use fee_schedule::{
    FeeConfig, FeeRateBps, FeeSchedule, FeeShares, FeeSplit, TaxBuckets, TransferKind,
    BPS_DENOMINATOR, MAX_FEE, REFLECTION_DIVISOR,
};
pub use ledger::Ledger;
pub use limits::LimitConfig;
pub use policy::{AccessPolicy, AccountFlags, OpContext};
pub use pool::{ConstantProductPool, DEFAULT_POOL_FEE_BPS};
pub use reflection::{base_for_reflected, reflected_balance, REFLECTION_GROWTH_FACTOR};
pub use swap_back::{
    FeeReceivers, FeesEnabled, SwapBackConfig, SwapBackController, SwapPayout, SwapState,
};
pub use token::{
    Account, ReflectionToken, TokenConfig, TransferReceipt, DECIMALS, DEFAULT_GRACE_PERIOD_SECS,
    DEFAULT_TOTAL_SUPPLY, REFLECTION_POOL, UNIT,
};
