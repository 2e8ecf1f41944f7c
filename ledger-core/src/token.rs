//! The token: ledger, fee engine and limit guard wired into one transfer path.
//!
//! Every transfer runs the same pipeline:
//!
//! 1. classify the transfer and compute the fee split
//! 2. check the sender's base balance
//! 3. run the limit guard against the projected post-transfer state
//! 4. move base units, grow `R`, attribute tax to receivers
//! 5. opportunistically run a swap-back
//!
//! Steps 1–3 only read state, so a rejected transfer changes nothing. A
//! failed swap-back in step 5 is logged and swallowed; the transfer it rode
//! on has already committed.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::address::Address;
use crate::base_asset::BaseAssetBook;
use crate::burn::{BurnToEarnConfig, BurnToEarnEngine};
use crate::error::LedgerError;
use crate::exchange::Exchange;
use crate::fee_schedule::{FeeConfig, FeeSchedule, FeeSplit, TaxBuckets, TransferKind};
use crate::ledger::Ledger;
use crate::limits::LimitConfig;
use crate::policy::{AccessPolicy, AccountFlags, OpContext};
use crate::reflection::reflected_balance;
use crate::swap_back::{FeeReceivers, FeesEnabled, SwapBackConfig, SwapBackController, SwapPayout};

pub const DECIMALS: u32 = 18;

/// One whole token in base units.
pub const UNIT: u128 = 10u128.pow(DECIMALS);

pub const DEFAULT_TOTAL_SUPPLY: u128 = 1_000_000_000 * UNIT;

/// System account that holds the base units behind the reflection slice.
pub const REFLECTION_POOL: Address = Address::from_low_u64(0x5245_464c);

/// Launch window during which grace-exempt accounts trade fee-free.
pub const DEFAULT_GRACE_PERIOD_SECS: u64 = 3 * 24 * 60 * 60;

/// Parameters fixed at creation; most can be changed later by the owner.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenConfig {
    pub total_supply: u128,
    pub fees: FeeConfig,
    pub limits: LimitConfig,
    pub swap_back: SwapBackConfig,
    /// Receivers of swap-back proceeds. `None` sends everything to the owner.
    pub receivers: Option<FeeReceivers>,
    pub burn_to_earn: BurnToEarnConfig,
    pub grace_period_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::with_supply(DEFAULT_TOTAL_SUPPLY)
    }
}

impl TokenConfig {
    /// Defaults scaled to `total_supply`.
    pub fn with_supply(total_supply: u128) -> Self {
        Self {
            total_supply,
            fees: FeeConfig::default(),
            limits: LimitConfig::for_supply(total_supply),
            swap_back: SwapBackConfig::for_supply(total_supply),
            receivers: None,
            burn_to_earn: BurnToEarnConfig::default(),
            grace_period_secs: DEFAULT_GRACE_PERIOD_SECS,
        }
    }
}

/// Combined view of an account's balances and flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    pub address: Address,
    pub base_balance: u128,
    pub effective_balance: u128,
    pub flags: AccountFlags,
}

/// What a transfer did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub split: FeeSplit,

    /// Swap-back triggered by this transfer, if any completed.
    pub swap_back: Option<SwapPayout>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReflectionToken {
    /// The token's own account; doubles as the tax-collection balance.
    pub(crate) address: Address,
    pub(crate) ledger: Ledger,
    pub(crate) fees: FeeConfig,
    pub(crate) limits: LimitConfig,
    pub(crate) tax_buckets: TaxBuckets,
    pub(crate) swap_back: SwapBackController,
    pub(crate) burn: BurnToEarnEngine,
    pub(crate) base_assets: BaseAssetBook,
    pub(crate) allowances: BTreeMap<(Address, Address), u128>,
    pub(crate) foreign_tokens: BTreeMap<Address, u128>,
}

impl ReflectionToken {
    /// Mint the whole supply to `owner` and build the matching access policy.
    ///
    /// The token account and the reflection pool are exempt from fees and
    /// limits. The owner is exempt from limits only; its transfers are taxed.
    pub fn create(
        address: Address,
        owner: Address,
        config: TokenConfig,
        now: u64,
    ) -> Result<(Self, AccessPolicy), LedgerError> {
        config.fees.buy.validate()?;
        config.fees.sell.validate()?;

        let mut policy = AccessPolicy::new(owner, now, config.grace_period_secs);
        policy.exempt_owner_from_limits();
        policy.exempt_system_account(address);
        policy.exempt_system_account(REFLECTION_POOL);

        let receivers = config
            .receivers
            .unwrap_or_else(|| FeeReceivers::all(owner));

        info!(
            %address,
            %owner,
            supply = config.total_supply,
            "token created"
        );

        let token = Self {
            address,
            ledger: Ledger::with_genesis(owner, config.total_supply),
            fees: config.fees,
            limits: config.limits,
            tax_buckets: TaxBuckets::default(),
            swap_back: SwapBackController::new(config.swap_back, receivers),
            burn: BurnToEarnEngine::new(config.burn_to_earn),
            base_assets: BaseAssetBook::default(),
            allowances: BTreeMap::new(),
            foreign_tokens: BTreeMap::new(),
        };
        Ok((token, policy))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Reported balance (reflection-adjusted unless `account` is a pair).
    pub fn balance_of(&self, account: &Address, policy: &AccessPolicy) -> u128 {
        self.ledger.effective_balance(account, policy)
    }

    pub fn base_balance_of(&self, account: &Address) -> u128 {
        self.ledger.base_balance_of(account)
    }

    /// Reported amount for `amount` base units held by `account`.
    pub fn base_to_reflection_amount(
        &self,
        amount: u128,
        account: &Address,
        policy: &AccessPolicy,
    ) -> u128 {
        self.ledger.base_to_reflection_amount(amount, account, policy)
    }

    /// Base units to pass to [`transfer`](Self::transfer) to move `amount` of
    /// `account`'s reported balance.
    pub fn reflection_to_base_amount(
        &self,
        amount: u128,
        account: &Address,
        policy: &AccessPolicy,
    ) -> u128 {
        self.ledger.reflection_to_base_amount(amount, account, policy)
    }

    pub fn account(&self, account: &Address, policy: &AccessPolicy) -> Account {
        Account {
            address: *account,
            base_balance: self.ledger.base_balance_of(account),
            effective_balance: self.ledger.effective_balance(account, policy),
            flags: policy.flags(account),
        }
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    pub fn total_reflected(&self) -> u128 {
        self.ledger.total_reflected()
    }

    pub fn total_sub_lp_balance(&self) -> u128 {
        self.ledger.total_sub_lp_balance()
    }

    /// Tokens waiting in the tax-collection account.
    pub fn tax_balance(&self) -> u128 {
        self.ledger.base_balance_of(&self.address)
    }

    pub fn tax_buckets(&self) -> &TaxBuckets {
        &self.tax_buckets
    }

    pub fn buy_fee(&self) -> &FeeSchedule {
        &self.fees.buy
    }

    pub fn sell_fee(&self) -> &FeeSchedule {
        &self.fees.sell
    }

    pub fn limits(&self) -> &LimitConfig {
        &self.limits
    }

    pub fn fees_enabled(&self) -> FeesEnabled {
        self.swap_back.config.fees_enabled
    }

    pub fn swap_threshold(&self) -> u128 {
        self.swap_back.config.swap_threshold
    }

    pub fn swap_back_controller(&self) -> &SwapBackController {
        &self.swap_back
    }

    #[cfg(any(test, feature = "test_utils"))]
    pub fn swap_back_controller_mut(&mut self) -> &mut SwapBackController {
        &mut self.swap_back
    }

    pub fn burn_engine(&self) -> &BurnToEarnEngine {
        &self.burn
    }

    pub fn base_asset_balance_of(&self, account: &Address) -> u128 {
        self.base_assets.balance_of(account)
    }

    /// Base asset held by the token account, reserve included.
    pub fn contract_base_balance(&self) -> u128 {
        self.base_assets.contract_balance()
    }

    pub fn foreign_token_balance(&self, token: &Address) -> u128 {
        self.foreign_tokens.get(token).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    // ========================================================================
    // Holder surface
    // ========================================================================

    /// Transfer `amount` from the caller to `to`.
    pub fn transfer(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        exchange: &mut dyn Exchange,
        to: Address,
        amount: u128,
    ) -> Result<TransferReceipt, LedgerError> {
        self.execute_transfer(ctx, policy, exchange, ctx.caller, to, amount)
    }

    /// Allow `spender` to move up to `amount` of the caller's tokens.
    pub fn approve(&mut self, ctx: &OpContext, spender: Address, amount: u128) {
        if amount == 0 {
            self.allowances.remove(&(ctx.caller, spender));
        } else {
            self.allowances.insert((ctx.caller, spender), amount);
        }
        debug!(owner = %ctx.caller, %spender, amount, "allowance set");
    }

    /// Transfer on behalf of `from` using the caller's allowance.
    pub fn transfer_from(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        exchange: &mut dyn Exchange,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<TransferReceipt, LedgerError> {
        let available = self.allowance(&from, &ctx.caller);
        if available < amount {
            return Err(LedgerError::InsufficientAllowance {
                available,
                requested: amount,
            });
        }
        let receipt = self.execute_transfer(ctx, policy, exchange, from, to, amount)?;
        let remaining = available - amount;
        if remaining == 0 {
            self.allowances.remove(&(from, ctx.caller));
        } else {
            self.allowances.insert((from, ctx.caller), remaining);
        }
        Ok(receipt)
    }

    fn execute_transfer(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        exchange: &mut dyn Exchange,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<TransferReceipt, LedgerError> {
        let kind = TransferKind::classify(&from, &to, policy);
        let schedule = *self.fees.schedule_for(kind);
        let split = if self.is_fee_exempt(policy, &from, &to, ctx.now) {
            FeeSplit::exempt(kind, amount)
        } else {
            schedule.split(kind, amount)
        };

        let available = self.ledger.base_balance_of(&from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        self.limits.enforce(policy, &from, &to, amount, || {
            self.projected_balance(policy, &from, &to, &split)
        })?;

        let mut credits = Vec::with_capacity(3);
        credits.push((to, split.net));
        if split.reflection > 0 {
            credits.push((REFLECTION_POOL, split.reflection));
        }
        if split.tax > 0 {
            credits.push((self.address, split.tax));
        }
        self.ledger.distribute(from, &credits, policy)?;
        self.ledger.adjust_reflection(split.reflection);
        if split.tax > 0 {
            self.tax_buckets.record(split.tax, &schedule.shares);
        }

        debug!(
            %from,
            %to,
            ?kind,
            amount,
            fee = split.fee,
            reflection = split.reflection,
            net = split.net,
            "transfer"
        );

        let acting_pair = policy.is_liquidity_pair(&ctx.caller) || policy.is_liquidity_pair(&from);
        let swap_back = if self.swap_back.should_trigger(self.tax_balance(), acting_pair) {
            match self.run_swap_back(policy, exchange) {
                Ok(payout) => payout,
                Err(err) => {
                    warn!(%err, tax = self.tax_balance(), "swap-back failed, tax retained");
                    None
                }
            }
        } else {
            None
        };

        Ok(TransferReceipt { split, swap_back })
    }

    fn is_fee_exempt(&self, policy: &AccessPolicy, from: &Address, to: &Address, now: u64) -> bool {
        policy.is_excluded_from_fee(from)
            || policy.is_excluded_from_fee(to)
            || policy.grace_applies(from, now)
            || policy.grace_applies(to, now)
    }

    /// Effective balance of `to` once `split` has been applied.
    fn projected_balance(
        &self,
        policy: &AccessPolicy,
        from: &Address,
        to: &Address,
        split: &FeeSplit,
    ) -> u128 {
        let mut base = self.ledger.base_balance_of(to);
        if from == to {
            base = base.saturating_sub(split.amount);
        }
        base = base.saturating_add(split.net);

        let mut sub_lp = self.ledger.total_sub_lp_balance();
        if policy.is_liquidity_pair(from) {
            sub_lp = sub_lp.saturating_add(split.amount);
        }
        let reflected = self.ledger.total_reflected().saturating_add(split.reflection);
        reflected_balance(base, sub_lp, reflected)
    }

    // ========================================================================
    // Owner surface
    // ========================================================================

    /// Replace both fee schedules.
    pub fn change_fees(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        buy: FeeSchedule,
        sell: FeeSchedule,
    ) -> Result<(), LedgerError> {
        policy.ensure_owner(&ctx.caller)?;
        self.fees.replace(buy, sell)?;
        info!(buy = buy.total, sell = sell.total, "fee schedules changed");
        Ok(())
    }

    pub fn set_limits(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        limits: LimitConfig,
    ) -> Result<(), LedgerError> {
        policy.ensure_owner(&ctx.caller)?;
        self.limits = limits;
        info!(
            enabled = limits.enabled,
            max_tx = limits.max_tx,
            max_wallet = limits.max_wallet,
            "limits changed"
        );
        Ok(())
    }

    /// Flag or unflag `account` as a liquidity pair and recompute `S`.
    pub fn set_liquidity_pair(
        &mut self,
        ctx: &OpContext,
        policy: &mut AccessPolicy,
        account: Address,
        is_pair: bool,
    ) -> Result<(), LedgerError> {
        policy.ensure_owner(&ctx.caller)?;
        policy.mark_liquidity_pair(account, is_pair);
        self.ledger.recompute_sub_lp_balance(policy);
        info!(
            %account,
            is_pair,
            sub_lp = self.ledger.total_sub_lp_balance(),
            "liquidity pair updated"
        );
        Ok(())
    }

    /// Move `amount` of the owner's tokens into `pair` as pool liquidity.
    ///
    /// Seeding liquidity is a plain ledger move: no fee, no limits and no
    /// swap-back.
    pub fn add_liquidity(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        pair: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        policy.ensure_owner(&ctx.caller)?;
        self.ledger.transfer_base(ctx.caller, pair, amount, policy)?;
        info!(
            %pair,
            amount,
            sub_lp = self.ledger.total_sub_lp_balance(),
            "liquidity added"
        );
        Ok(())
    }

    /// Record base asset sent straight to the token account.
    pub fn receive_base(&mut self, amount: u128) {
        self.base_assets.receive(amount);
    }

    /// Record a foreign token sent to the token account.
    pub fn receive_foreign_token(&mut self, token: Address, amount: u128) {
        let entry = self.foreign_tokens.entry(token).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Send the owner any base asset not reserved for burn-to-earn.
    pub fn clear_stuck_balance(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
    ) -> Result<u128, LedgerError> {
        policy.ensure_owner(&ctx.caller)?;
        let sweepable = self
            .base_assets
            .contract_balance()
            .saturating_sub(self.burn.state.b2e_reserve);
        self.base_assets.pay(policy.owner(), sweepable)?;
        info!(amount = sweepable, "stuck base asset cleared");
        Ok(sweepable)
    }

    /// Send the owner the whole holding of a foreign `token`.
    pub fn clear_stuck_token(
        &mut self,
        ctx: &OpContext,
        policy: &AccessPolicy,
        token: Address,
    ) -> Result<u128, LedgerError> {
        policy.ensure_owner(&ctx.caller)?;
        let amount = self.foreign_tokens.remove(&token).unwrap_or(0);
        info!(%token, amount, owner = %policy.owner(), "stuck token cleared");
        Ok(amount)
    }
}
