//! Burn-to-earn: holders destroy tokens for base asset from a reserve.
//!
//! The reserve is funded by a share of every swap-back plus direct deposits.
//! Each burn window allows a bounded amount to be burned:
//!
//! ```text
//! burn_cap_in_eth    = reserve · burn_cap_bps / 10000
//! max_eth_output     = min(burn_cap_in_eth · reward_multiplier_bps / 10000, reserve)
//! max_tokens_to_burn = burn_cap_in_eth at the pool's spot price, in tokens
//! reward(amount)     = ⌊max_eth_output · amount / max_tokens_to_burn⌋
//! ```
//!
//! ## Example
//!
//! With 10 base in reserve, a 10% cap, a 1x multiplier and a pool pricing
//! one base at 500,000 tokens:
//! - `burn_cap_in_eth` = 1 base
//! - `max_tokens_to_burn` = 500,000 tokens
//! - burning 250,000 tokens pays 0.5 base
//!
//! After a burn, nobody may burn again until the cooldown has elapsed.

use tracing::info;

use crate::error::LedgerError;
use crate::exchange::{Exchange, PoolReserves};
use crate::fee_schedule::{FeeRateBps, BPS_DENOMINATOR};
use crate::policy::{AccessPolicy, OpContext};
use crate::reflection::mul_div;
use crate::token::ReflectionToken;

/// Configuration for burn-to-earn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BurnToEarnConfig {
    /// Seconds between burns.
    pub cooldown_secs: u64,

    /// Share of the reserve that one window may pay out, before the multiplier.
    pub burn_cap_bps: FeeRateBps,

    /// Reward relative to market value (10000 = 1x).
    pub reward_multiplier_bps: FeeRateBps,
}

impl Default for BurnToEarnConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 3_600,          // one burn per hour
            burn_cap_bps: 1_000,           // 10% of reserve per window
            reward_multiplier_bps: 10_000, // market value
        }
    }
}

/// Running totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BurnToEarnState {
    /// Tokens destroyed through burn-to-earn.
    pub total_burned: u128,

    /// Base asset paid out as rewards.
    pub total_burn_rewards: u128,

    /// Base asset reserved for rewards.
    pub b2e_reserve: u128,

    /// Time of the last burn, if any.
    pub last_burn_timestamp: Option<u64>,
}

/// Snapshot returned by [`ReflectionToken::burn_to_earn_info`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BurnToEarnInfo {
    pub total_burned: u128,
    pub total_burn_rewards: u128,
    pub b2e_reserve: u128,
    pub time_to_next_burn: u64,
    pub max_tokens_to_burn: u128,
    pub burn_cap_in_eth: u128,
    pub max_eth_output: u128,
}

/// Outcome of a successful burn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurnReceipt {
    pub burned: u128,
    pub reward: u128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BurnToEarnEngine {
    pub config: BurnToEarnConfig,
    pub state: BurnToEarnState,
}

impl BurnToEarnEngine {
    pub fn new(config: BurnToEarnConfig) -> Self {
        Self {
            config,
            state: BurnToEarnState::default(),
        }
    }

    /// Seconds until the next burn is allowed at `now`.
    pub fn time_to_next_burn(&self, now: u64) -> u64 {
        match self.state.last_burn_timestamp {
            Some(last) => last
                .saturating_add(self.config.cooldown_secs)
                .saturating_sub(now),
            None => 0,
        }
    }

    pub fn burn_cap_in_eth(&self) -> u128 {
        mul_div(
            self.state.b2e_reserve,
            self.config.burn_cap_bps as u128,
            BPS_DENOMINATOR,
        )
    }

    pub fn max_eth_output(&self) -> u128 {
        mul_div(
            self.burn_cap_in_eth(),
            self.config.reward_multiplier_bps as u128,
            BPS_DENOMINATOR,
        )
        .min(self.state.b2e_reserve)
    }

    pub fn max_tokens_to_burn(&self, reserves: &PoolReserves) -> u128 {
        reserves.quote_tokens_for_base(self.burn_cap_in_eth())
    }

    /// Reward for burning `amount`, assuming it is within the cap.
    pub fn reward_for(&self, amount: u128, reserves: &PoolReserves) -> u128 {
        mul_div(
            self.max_eth_output(),
            amount,
            self.max_tokens_to_burn(reserves),
        )
    }

    pub fn info(&self, now: u64, reserves: &PoolReserves) -> BurnToEarnInfo {
        BurnToEarnInfo {
            total_burned: self.state.total_burned,
            total_burn_rewards: self.state.total_burn_rewards,
            b2e_reserve: self.state.b2e_reserve,
            time_to_next_burn: self.time_to_next_burn(now),
            max_tokens_to_burn: self.max_tokens_to_burn(reserves),
            burn_cap_in_eth: self.burn_cap_in_eth(),
            max_eth_output: self.max_eth_output(),
        }
    }

    /// Validate a burn of `amount` at `now` and return the reward it earns.
    pub fn check(&self, amount: u128, now: u64, reserves: &PoolReserves) -> Result<u128, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let remaining_secs = self.time_to_next_burn(now);
        if remaining_secs > 0 {
            return Err(LedgerError::BurnCooldownActive { remaining_secs });
        }
        let cap = self.max_tokens_to_burn(reserves);
        if amount > cap {
            return Err(LedgerError::BurnCapExceeded {
                requested: amount,
                cap,
            });
        }
        Ok(self.reward_for(amount, reserves))
    }

    pub(crate) fn deposit(&mut self, amount: u128) {
        self.state.b2e_reserve = self.state.b2e_reserve.saturating_add(amount);
    }

    fn record_burn(&mut self, amount: u128, reward: u128, now: u64) {
        self.state.total_burned = self.state.total_burned.saturating_add(amount);
        self.state.total_burn_rewards = self.state.total_burn_rewards.saturating_add(reward);
        self.state.b2e_reserve -= reward;
        self.state.last_burn_timestamp = Some(now);
    }
}

impl ReflectionToken {
    /// Burn `amount` of the caller's tokens for a share of the reserve.
    pub fn burn_to_earn(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        exchange: &dyn Exchange,
        amount: u128,
    ) -> Result<BurnReceipt, LedgerError> {
        let reward = self.burn.check(amount, ctx.now, &exchange.reserves())?;
        let available = self.ledger.base_balance_of(&ctx.caller);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        self.base_assets.pay(ctx.caller, reward)?;
        self.ledger.burn(ctx.caller, amount, policy)?;
        self.burn.record_burn(amount, reward, ctx.now);

        info!(
            burner = %ctx.caller,
            amount,
            reward,
            supply = self.ledger.total_supply(),
            "burn-to-earn"
        );
        Ok(BurnReceipt {
            burned: amount,
            reward,
        })
    }

    pub fn burn_to_earn_info(&self, now: u64, exchange: &dyn Exchange) -> BurnToEarnInfo {
        self.burn.info(now, &exchange.reserves())
    }

    /// Add base asset to the burn-to-earn reserve.
    pub fn fund_burn_reserve(&mut self, amount: u128) {
        self.base_assets.receive(amount);
        self.burn.deposit(amount);
        info!(amount, reserve = self.burn.state.b2e_reserve, "burn reserve funded");
    }
}
