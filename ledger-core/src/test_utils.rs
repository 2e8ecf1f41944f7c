//! Fixtures for tests.
//!
//! [`Fixture`] launches a token against a [`ConstantProductPool`] the same way
//! the operator CLI does.

use crate::address::Address;
use crate::policy::{AccessPolicy, OpContext};
use crate::pool::ConstantProductPool;
use crate::token::{ReflectionToken, TokenConfig, UNIT};

/// Deterministic holder address.
pub fn holder(n: u64) -> Address {
    Address::from_low_u64(0x1000 + n)
}

pub const OWNER: Address = Address::from_low_u64(0x01);
pub const CONTRACT: Address = Address::from_low_u64(0xc0);
pub const PAIR: Address = Address::from_low_u64(0x9a);

/// A launched token: pair registered, 750M tokens against 1,000 base in the
/// pool, owner holding the rest.
pub struct Fixture {
    pub token: ReflectionToken,
    pub policy: AccessPolicy,
    pub pool: ConstantProductPool,
}

impl Fixture {
    pub fn launched(config: TokenConfig) -> Self {
        let (mut token, mut policy) = match ReflectionToken::create(CONTRACT, OWNER, config, 0) {
            Ok(created) => created,
            Err(err) => panic!("fixture config rejected: {err}"),
        };
        let mut pool = ConstantProductPool::new(PAIR, 0, 1_000 * UNIT);
        let ctx = OpContext::new(OWNER, 0);
        let liquidity = token.total_supply() / 4 * 3;
        token
            .set_liquidity_pair(&ctx, &mut policy, PAIR, true)
            .and_then(|_| token.add_liquidity(&ctx, &policy, PAIR, liquidity))
            .unwrap_or_else(|err| panic!("fixture liquidity failed: {err}"));
        pool.sync_token_reserve(liquidity);
        Self {
            token,
            policy,
            pool,
        }
    }

    pub fn owner_ctx(&self) -> OpContext {
        OpContext::new(OWNER, 0)
    }

    /// Fee-free transfer from the owner.
    ///
    /// The owner is taxed like any holder, so the exemption is switched on
    /// for this transfer only.
    pub fn fund(&mut self, to: Address, amount: u128) {
        let ctx = self.owner_ctx();
        let was_exempt = self.policy.is_excluded_from_fee(&OWNER);
        self.policy
            .set_fee_exempt(&ctx, OWNER, true)
            .and_then(|_| {
                self.token
                    .transfer(&ctx, &self.policy, &mut self.pool, to, amount)
            })
            .and_then(|_| self.policy.set_fee_exempt(&ctx, OWNER, was_exempt))
            .unwrap_or_else(|err| panic!("funding {to} failed: {err}"));
    }

    /// Buy from the pool on behalf of `to`, moving tokens through the ledger.
    pub fn buy(&mut self, to: Address, base_in: u128, now: u64) -> Result<u128, crate::LedgerError> {
        let tokens = self.pool.quote_tokens_out(base_in);
        let ctx = OpContext::new(PAIR, now);
        let receipt = self
            .token
            .transfer(&ctx, &self.policy, &mut self.pool, to, tokens)?;
        self.pool
            .buy(base_in)
            .unwrap_or_else(|err| panic!("pool rejected buy: {err}"));
        Ok(receipt.split.net)
    }
}
