//! Error taxonomy for ledger operations.
//!
//! Every error is terminal for the operation that produced it: nothing is
//! retried internally and no partial state is left behind. The one exception
//! is [`LedgerError::SwapBackFailed`], which the swap-back controller recovers
//! from when it was triggered opportunistically by a transfer.

use thiserror::Error;

use crate::address::Address;
use crate::fee_schedule::FeeRateBps;

/// Failure reported by the external exchange during a swap.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExchangeError {
    #[error("pool has no liquidity")]
    NoLiquidity,

    #[error("swap would produce no output")]
    ZeroOutput,

    #[error("exchange rejected swap: {0}")]
    Rejected(String),
}

/// Errors returned by ledger operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: u128, requested: u128 },

    #[error("insufficient allowance: available {available}, requested {requested}")]
    InsufficientAllowance { available: u128, requested: u128 },

    #[error("transfer of {amount} exceeds max transaction {max_tx}")]
    TxLimitExceeded { amount: u128, max_tx: u128 },

    #[error("resulting balance {resulting} exceeds max wallet {max_wallet}")]
    WalletLimitExceeded { resulting: u128, max_wallet: u128 },

    #[error("fee total {total} bps exceeds maximum {max} bps")]
    FeeTooHigh { total: FeeRateBps, max: FeeRateBps },

    #[error("declared fee total {declared} bps does not match share sum {sum} bps")]
    FeeScheduleMismatch { declared: FeeRateBps, sum: FeeRateBps },

    #[error("swap-back failed: {0}")]
    SwapBackFailed(#[from] ExchangeError),

    #[error("burn of {requested} exceeds current cap {cap}")]
    BurnCapExceeded { requested: u128, cap: u128 },

    #[error("burn cooldown active for another {remaining_secs}s")]
    BurnCooldownActive { remaining_secs: u64 },

    #[error("burn amount must be non-zero")]
    ZeroAmount,

    #[error("insufficient base asset: available {available}, requested {requested}")]
    InsufficientReserve { available: u128, requested: u128 },

    #[error("caller {caller} is not authorized")]
    Unauthorized { caller: Address },
}
