//! Swap-back: converting collected tax into base asset for fee receivers.
//!
//! ## State machine
//!
//! ```text
//!          trigger holds            exchange returns
//!   Idle ─────────────────► Swapping ─────────────────► Idle
//!                               │ nested entry: no-op
//! ```
//!
//! The trigger holds when fees are enabled, the tax balance is non-zero and
//! at least the threshold, and neither the caller nor the sender of the
//! triggering transfer is a liquidity pair (the pool is mid-operation).
//!
//! ## Payout
//!
//! On success the whole tax balance moves to the pair and the proceeds are
//! divided as follows:
//!
//! | Slice     | Amount                                  |
//! |-----------|-----------------------------------------|
//! | reserve   | `proceeds · burn_reserve_bps / 10000`   |
//! | receivers | remainder, split by tax bucket weights  |
//!
//! Bucket weights record which schedule shares were in force when the tax
//! was collected. If the buckets are empty the sell schedule's shares are
//! used. Treasury absorbs rounding.
//!
//! A failed exchange call leaves every balance and aggregate as it was.

use tracing::info;

use crate::address::Address;
use crate::error::LedgerError;
use crate::exchange::Exchange;
use crate::fee_schedule::{proportion, FeeRateBps, FeeShares, TaxBuckets, BPS_DENOMINATOR};
use crate::policy::{AccessPolicy, OpContext};
use crate::reflection::mul_div;
use crate::token::ReflectionToken;

/// Whether automatic swap-back runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeesEnabled {
    Disabled,
    #[default]
    Enabled,
}

impl FeesEnabled {
    /// Decode the administrative flag: `1` enables, anything else disables.
    pub fn from_flag(flag: u8) -> Self {
        if flag == 1 {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    pub fn as_flag(self) -> u8 {
        match self {
            Self::Disabled => 0,
            Self::Enabled => 1,
        }
    }

    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapBackConfig {
    pub fees_enabled: FeesEnabled,

    /// Tax balance, in tokens, at which a swap-back fires.
    pub swap_threshold: u128,

    /// Share of proceeds kept for burn-to-earn rewards.
    pub burn_reserve_bps: FeeRateBps,
}

impl SwapBackConfig {
    /// Default settings: enabled, threshold at 0.05% of supply, 20% to reserve.
    pub fn for_supply(total_supply: u128) -> Self {
        Self {
            fees_enabled: FeesEnabled::Enabled,
            swap_threshold: total_supply / 2_000,
            burn_reserve_bps: 2_000,
        }
    }
}

/// Addresses paid from swap-back proceeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeeReceivers {
    pub marketing: Address,
    pub liquidity: Address,
    pub buyback: Address,
    pub treasury: Address,
}

impl FeeReceivers {
    /// Route every slice to one address.
    pub fn all(receiver: Address) -> Self {
        Self {
            marketing: receiver,
            liquidity: receiver,
            buyback: receiver,
            treasury: receiver,
        }
    }

    pub fn as_array(&self) -> [Address; 4] {
        [self.marketing, self.liquidity, self.buyback, self.treasury]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapState {
    #[default]
    Idle,
    Swapping,
}

/// Result of a completed swap-back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapPayout {
    pub tokens_swapped: u128,
    pub proceeds: u128,
    pub reserve: u128,
    pub marketing: u128,
    pub liquidity: u128,
    pub buyback: u128,
    pub treasury: u128,
}

impl SwapPayout {
    fn receiver_amounts(&self) -> [u128; 4] {
        [self.marketing, self.liquidity, self.buyback, self.treasury]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapBackController {
    pub config: SwapBackConfig,
    pub receivers: FeeReceivers,
    state: SwapState,
}

impl SwapBackController {
    pub fn new(config: SwapBackConfig, receivers: FeeReceivers) -> Self {
        Self {
            config,
            receivers,
            state: SwapState::Idle,
        }
    }

    pub fn state(&self) -> SwapState {
        self.state
    }

    /// Whether a transfer that left `tax_balance` in the contract should
    /// start a swap-back.
    pub fn should_trigger(&self, tax_balance: u128, pair_is_acting: bool) -> bool {
        self.state == SwapState::Idle
            && self.config.fees_enabled.is_enabled()
            && tax_balance > 0
            && tax_balance >= self.config.swap_threshold
            && !pair_is_acting
    }

    /// Enter `Swapping`. Returns false if a swap is already in progress.
    fn begin(&mut self) -> bool {
        if self.state == SwapState::Swapping {
            return false;
        }
        self.state = SwapState::Swapping;
        true
    }

    fn finish(&mut self) {
        self.state = SwapState::Idle;
    }

    /// Force the controller into `state`, simulating an in-flight swap.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn force_state(&mut self, state: SwapState) {
        self.state = state;
    }

    /// Divide `proceeds` between the reserve and the four receivers.
    pub fn plan_payout(
        &self,
        tokens_swapped: u128,
        proceeds: u128,
        buckets: &TaxBuckets,
        fallback: &FeeShares,
    ) -> SwapPayout {
        let reserve = mul_div(proceeds, self.config.burn_reserve_bps as u128, BPS_DENOMINATOR);
        let distributable = proceeds - reserve.min(proceeds);
        let weights = if buckets.is_empty() {
            fallback.as_array().map(u128::from)
        } else {
            buckets.as_array()
        };
        let [marketing, liquidity, buyback, treasury] = proportion(distributable, weights);
        SwapPayout {
            tokens_swapped,
            proceeds,
            reserve: reserve.min(proceeds),
            marketing,
            liquidity,
            buyback,
            treasury,
        }
    }
}

impl ReflectionToken {
    /// Change the swap-back flag and threshold.
    pub fn set_swap_back_settings(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        flag: u8,
        threshold: u128,
    ) -> Result<(), LedgerError> {
        policy.ensure_owner(&ctx.caller)?;
        self.swap_back.config.fees_enabled = FeesEnabled::from_flag(flag);
        self.swap_back.config.swap_threshold = threshold;
        info!(
            fees_enabled = flag,
            threshold,
            "swap-back settings changed"
        );
        Ok(())
    }

    pub fn set_fee_receivers(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        receivers: FeeReceivers,
    ) -> Result<(), LedgerError> {
        policy.ensure_owner(&ctx.caller)?;
        self.swap_back.receivers = receivers;
        info!(
            marketing = %receivers.marketing,
            liquidity = %receivers.liquidity,
            buyback = %receivers.buyback,
            treasury = %receivers.treasury,
            "fee receivers changed"
        );
        Ok(())
    }

    /// Run a swap-back now, regardless of threshold.
    ///
    /// Unlike the automatic path, an exchange failure is returned as
    /// `SwapBackFailed`. Returns `Ok(None)` when there is nothing to swap or a
    /// swap is already in progress.
    pub fn swap_back(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        exchange: &mut dyn Exchange,
    ) -> Result<Option<SwapPayout>, LedgerError> {
        policy.ensure_owner(&ctx.caller)?;
        self.run_swap_back(policy, exchange)
    }

    pub(crate) fn run_swap_back(
        &mut self,
        policy: &AccessPolicy,
        exchange: &mut dyn Exchange,
    ) -> Result<Option<SwapPayout>, LedgerError> {
        let tokens = self.tax_balance();
        if tokens == 0 || !self.swap_back.begin() {
            return Ok(None);
        }

        let result = self.settle_swap(policy, exchange, tokens);
        self.swap_back.finish();
        result.map(Some)
    }

    fn settle_swap(
        &mut self,
        policy: &AccessPolicy,
        exchange: &mut dyn Exchange,
        tokens: u128,
    ) -> Result<SwapPayout, LedgerError> {
        let proceeds = exchange.swap_tokens_for_base(tokens)?;

        self.ledger
            .transfer_base(self.address, exchange.pair(), tokens, policy)?;
        let payout = self.swap_back.plan_payout(
            tokens,
            proceeds,
            &self.tax_buckets,
            &self.fees.sell.shares,
        );
        self.tax_buckets = TaxBuckets::default();

        self.base_assets.receive(proceeds);
        self.burn.deposit(payout.reserve);
        let receivers = self.swap_back.receivers.as_array();
        for (receiver, amount) in receivers.into_iter().zip(payout.receiver_amounts()) {
            self.base_assets.pay(receiver, amount)?;
        }

        info!(
            tokens,
            proceeds,
            reserve = payout.reserve,
            sub_lp = self.ledger.total_sub_lp_balance(),
            "swap-back completed"
        );
        Ok(payout)
    }
}
