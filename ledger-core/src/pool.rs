//! Simulated constant-product pool.
//!
//! [`ConstantProductPool`] is an `x·y = k` pool with a swap fee. It stands in
//! for the external AMM wherever no real exchange is attached: the operator
//! CLI persists one alongside the ledger, and tests drive it directly. Swaps
//! can be switched to fail on demand.

use primitive_types::U256;

use crate::address::Address;
use crate::error::ExchangeError;
use crate::exchange::{Exchange, PoolReserves};

/// Default swap fee charged by the pool, in basis points.
pub const DEFAULT_POOL_FEE_BPS: u32 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstantProductPool {
    pair: Address,
    reserves: PoolReserves,
    fee_bps: u32,
    failing: bool,
    swaps: u64,
}

impl ConstantProductPool {
    pub fn new(pair: Address, token_reserve: u128, base_reserve: u128) -> Self {
        Self {
            pair,
            reserves: PoolReserves::new(token_reserve, base_reserve),
            fee_bps: DEFAULT_POOL_FEE_BPS,
            failing: false,
            swaps: 0,
        }
    }

    pub fn with_fee_bps(mut self, fee_bps: u32) -> Self {
        self.fee_bps = fee_bps;
        self
    }

    /// Make subsequent swaps fail (or succeed again).
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Number of successful tax swaps.
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }

    /// Overwrite the token reserve, e.g. after tokens were moved to the pair
    /// through the ledger.
    pub fn sync_token_reserve(&mut self, token_reserve: u128) {
        self.reserves.token = token_reserve;
    }

    /// Tokens out for `base_in`, after the pool fee.
    pub fn quote_tokens_out(&self, base_in: u128) -> u128 {
        amount_out(base_in, self.reserves.base, self.reserves.token, self.fee_bps)
    }

    /// Base out for `tokens_in`, after the pool fee.
    pub fn quote_base_out(&self, tokens_in: u128) -> u128 {
        amount_out(tokens_in, self.reserves.token, self.reserves.base, self.fee_bps)
    }

    /// Apply a buy: `base_in` enters, the quoted tokens leave. Returns tokens out.
    ///
    /// The caller is responsible for moving the tokens out of the pair in the
    /// ledger.
    pub fn buy(&mut self, base_in: u128) -> Result<u128, ExchangeError> {
        if self.reserves.token == 0 || self.reserves.base == 0 {
            return Err(ExchangeError::NoLiquidity);
        }
        let out = self.quote_tokens_out(base_in);
        if out == 0 {
            return Err(ExchangeError::ZeroOutput);
        }
        self.reserves.base += base_in;
        self.reserves.token -= out;
        Ok(out)
    }

    /// Apply a sell of tokens that already reached the pair. Returns base out.
    pub fn sell(&mut self, tokens_in: u128) -> Result<u128, ExchangeError> {
        if self.reserves.token == 0 || self.reserves.base == 0 {
            return Err(ExchangeError::NoLiquidity);
        }
        let out = self.quote_base_out(tokens_in);
        if out == 0 {
            return Err(ExchangeError::ZeroOutput);
        }
        self.reserves.token += tokens_in;
        self.reserves.base -= out;
        Ok(out)
    }
}

impl Exchange for ConstantProductPool {
    fn pair(&self) -> Address {
        self.pair
    }

    fn reserves(&self) -> PoolReserves {
        self.reserves
    }

    fn swap_tokens_for_base(&mut self, token_amount: u128) -> Result<u128, ExchangeError> {
        if self.failing {
            return Err(ExchangeError::Rejected("injected failure".to_string()));
        }
        let out = self.sell(token_amount)?;
        self.swaps += 1;
        Ok(out)
    }
}

fn amount_out(amount_in: u128, reserve_in: u128, reserve_out: u128, fee_bps: u32) -> u128 {
    let with_fee = U256::from(amount_in) * U256::from(10_000u32.saturating_sub(fee_bps));
    let numerator = with_fee * U256::from(reserve_out);
    let denominator = U256::from(reserve_in) * U256::from(10_000u32) + with_fee;
    if denominator.is_zero() {
        return 0;
    }
    // bounded by reserve_out
    (numerator / denominator).low_u128()
}
