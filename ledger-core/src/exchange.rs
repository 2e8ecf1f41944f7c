//! Boundary to the external AMM.
//!
//! The pool's pricing curve is not modelled here. The ledger only needs to
//! know which account is the pair, what the reserves are for quoting, and a
//! way to sell accumulated tax for base asset.

use crate::address::Address;
use crate::error::ExchangeError;
use crate::reflection::mul_div;

/// Pool reserves as reported by the exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolReserves {
    /// Token side.
    pub token: u128,

    /// Base-asset side.
    pub base: u128,
}

impl PoolReserves {
    pub fn new(token: u128, base: u128) -> Self {
        Self { token, base }
    }

    /// Tokens worth `base_amount` at the spot price. Zero when the pool is empty.
    pub fn quote_tokens_for_base(&self, base_amount: u128) -> u128 {
        if self.base == 0 {
            return 0;
        }
        mul_div(base_amount, self.token, self.base)
    }

    /// Base asset worth `token_amount` at the spot price.
    pub fn quote_base_for_tokens(&self, token_amount: u128) -> u128 {
        if self.token == 0 {
            return 0;
        }
        mul_div(token_amount, self.base, self.token)
    }
}

/// The AMM the ledger trades its tax against.
pub trait Exchange {
    /// Account the pool holds tokens under.
    fn pair(&self) -> Address;

    fn reserves(&self) -> PoolReserves;

    /// Sell `token_amount` into the pool, returning base asset received.
    ///
    /// On error the exchange must not have taken the tokens.
    fn swap_tokens_for_base(&mut self, token_amount: u128) -> Result<u128, ExchangeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_quotes() {
        let reserves = PoolReserves::new(750_000, 1_500);
        assert_eq!(reserves.quote_tokens_for_base(3), 1_500);
        assert_eq!(reserves.quote_base_for_tokens(1_000), 2);
    }

    #[test]
    fn test_empty_pool_quotes_zero() {
        let reserves = PoolReserves::default();
        assert_eq!(reserves.quote_tokens_for_base(100), 0);
        assert_eq!(reserves.quote_base_for_tokens(100), 0);
    }
}
