//! End-to-end token flows.
//!
//! Drives a launched token (pair registered, 750M tokens of liquidity) through
//! the scenarios that cross component boundaries:
//! 1. Reflection scenario - a single taxed transfer from a fresh supply
//! 2. Swap-back - trigger, payout, failure recovery and re-entrancy
//! 3. Limit guard - transaction and wallet caps on pool trades
//! 4. Burn-to-earn - rewards, cooldown and cap
//! 5. Administration - fee changes and owner-only operations

use brb_ledger_core::test_utils::{holder, Fixture, CONTRACT, OWNER, PAIR};
use brb_ledger_core::{
    ConstantProductPool, ExchangeError, FeeSchedule, FeeShares, LedgerError, LimitConfig, OpContext, ReflectionToken,
    SwapState, TokenConfig, TransferKind, DEFAULT_TOTAL_SUPPLY, REFLECTION_POOL, UNIT,
};

fn launched() -> Fixture {
    Fixture::launched(TokenConfig::default())
}

/// Launched token with a 10,000 token swap threshold.
fn launched_with_threshold() -> Fixture {
    let mut fx = launched();
    let ctx = fx.owner_ctx();
    fx.token
        .set_swap_back_settings(&ctx, &fx.policy, 1, 10_000 * UNIT)
        .unwrap();
    fx
}

// ============================================================================
// Reflection Scenario
// ============================================================================

#[test]
fn test_single_transfer_from_fresh_supply() {
    let (mut token, mut policy) =
        ReflectionToken::create(CONTRACT, OWNER, TokenConfig::default(), 0).unwrap();
    let mut pool = ConstantProductPool::new(PAIR, 0, 0);
    let (alice, bob) = (holder(1), holder(2));
    // hand out the starting balance without growing R
    policy
        .set_fee_exempt(&OpContext::new(OWNER, 0), OWNER, true)
        .unwrap();

    token
        .transfer(&OpContext::new(OWNER, 0), &policy, &mut pool, alice, 10 * UNIT)
        .unwrap();
    assert_eq!(token.total_reflected(), 0);
    let s0 = token.total_sub_lp_balance();
    assert_eq!(s0, DEFAULT_TOTAL_SUPPLY);

    token
        .transfer(&OpContext::new(alice, 1), &policy, &mut pool, bob, UNIT)
        .unwrap();

    let credited = token.base_balance_of(&bob);
    assert_eq!(credited, 940_000_000_000_000_000);
    assert_eq!(token.total_reflected(), 10_000_000_000_000_000);

    // S = 1e27 and C·R = 1e18, so base·S/(C·R+S) = base·1e9/(1e9+1)
    let quotient = credited * 1_000_000_000 / 1_000_000_001;
    assert_eq!(token.balance_of(&bob, &policy), 2 * credited - quotient);
    assert!(token.balance_of(&bob, &policy) > credited);
    assert!(token.ledger().is_conserved());
}

/// Plain wallet-to-wallet transfers are assumed to be taxed with the buy
/// schedule. This pins that assumption: if it changes, this test should be
/// revisited rather than the schedules.
#[test]
fn test_plain_transfer_assumed_taxed_as_buy() {
    let mut fx = launched();
    let ctx = fx.owner_ctx();
    let buy = FeeSchedule::new(FeeShares::new(100, 0, 0, 100));
    let sell = FeeSchedule::new(FeeShares::new(500, 200, 200, 100));
    fx.token.change_fees(&ctx, &fx.policy, buy, sell).unwrap();

    let (alice, bob) = (holder(1), holder(2));
    fx.fund(alice, 100 * UNIT);
    let receipt = fx
        .token
        .transfer(&OpContext::new(alice, 1), &fx.policy, &mut fx.pool, bob, 10 * UNIT)
        .unwrap();

    assert_eq!(receipt.split.kind, TransferKind::Plain);
    assert_eq!(receipt.split.fee, 10 * UNIT * 200 / 10_000);
    assert_eq!(fx.token.base_balance_of(&bob), 10 * UNIT * 98 / 100);
}

#[test]
fn test_sell_uses_sell_schedule() {
    let mut fx = launched();
    let ctx = fx.owner_ctx();
    let buy = FeeSchedule::new(FeeShares::new(100, 0, 0, 100));
    let sell = FeeSchedule::new(FeeShares::new(500, 200, 200, 100));
    fx.token.change_fees(&ctx, &fx.policy, buy, sell).unwrap();

    let alice = holder(1);
    fx.fund(alice, 100 * UNIT);
    let pair_before = fx.token.base_balance_of(&PAIR);
    let receipt = fx
        .token
        .transfer(&OpContext::new(alice, 1), &fx.policy, &mut fx.pool, PAIR, 10 * UNIT)
        .unwrap();

    assert_eq!(receipt.split.kind, TransferKind::Sell);
    assert_eq!(receipt.split.net, 9 * UNIT);
    assert_eq!(fx.token.base_balance_of(&PAIR), pair_before + 9 * UNIT);
    assert_eq!(fx.token.balance_of(&PAIR, &fx.policy), pair_before + 9 * UNIT);
}

#[test]
fn test_buy_moves_supply_out_of_pair() {
    let mut fx = launched();
    let alice = holder(1);
    let s_before = fx.token.total_sub_lp_balance();
    let quoted = fx.pool.quote_tokens_out(UNIT);

    let net = fx.buy(alice, UNIT, 1).unwrap();

    assert_eq!(net, quoted - quoted * 600 / 10_000);
    assert_eq!(fx.token.base_balance_of(&alice), net);
    assert_eq!(fx.token.total_sub_lp_balance(), s_before + quoted);
    assert_eq!(fx.token.total_reflected(), quoted / 100);
    assert_eq!(fx.token.base_balance_of(&REFLECTION_POOL), quoted / 100);
    assert!(fx.token.ledger().is_conserved());
}

#[test]
fn test_owner_sell_grows_reflection() {
    let mut fx = launched();
    let ctx = fx.owner_ctx();
    let r_before = fx.token.total_reflected();

    let receipt = fx
        .token
        .transfer(&ctx, &fx.policy, &mut fx.pool, PAIR, 100 * UNIT)
        .unwrap();

    assert_eq!(receipt.split.kind, TransferKind::Sell);
    assert_eq!(fx.token.total_reflected(), r_before + UNIT);
    assert!(fx.token.tax_balance() > 0);
}

#[test]
fn test_full_reported_balance_can_be_sold() {
    let mut config = TokenConfig::default();
    config.limits = LimitConfig::disabled();
    let mut fx = Fixture::launched(config);
    let alice = holder(1);
    fx.buy(alice, UNIT, 1).unwrap();
    fx.buy(holder(2), UNIT, 2).unwrap();

    let reported = fx.token.balance_of(&alice, &fx.policy);
    let base = fx.token.base_balance_of(&alice);
    assert!(reported > base);

    // the reported figure itself is more than the ledger holds
    assert!(matches!(
        fx.token
            .clone()
            .transfer(&OpContext::new(alice, 3), &fx.policy, &mut fx.pool.clone(), PAIR, reported),
        Err(LedgerError::InsufficientBalance { .. })
    ));

    let spend = fx.token.reflection_to_base_amount(reported, &alice, &fx.policy);
    assert_eq!(spend, base);
    fx.token
        .transfer(&OpContext::new(alice, 3), &fx.policy, &mut fx.pool, PAIR, spend)
        .unwrap();
    assert_eq!(fx.token.balance_of(&alice, &fx.policy), 0);
    assert!(fx.token.ledger().is_conserved());
}

// ============================================================================
// Swap-Back
// ============================================================================

#[test]
fn test_owner_transfers_fill_tax_and_trigger_swap_back() {
    let mut fx = launched_with_threshold();
    let ctx = fx.owner_ctx();
    let bob = holder(2);

    let first = fx
        .token
        .transfer(&ctx, &fx.policy, &mut fx.pool, bob, 107_000 * UNIT)
        .unwrap();
    assert!(first.swap_back.is_none());
    assert_eq!(fx.token.tax_balance(), 5_350 * UNIT);
    assert_eq!(fx.token.total_reflected(), 1_070 * UNIT);

    let second = fx
        .token
        .transfer(&ctx, &fx.policy, &mut fx.pool, bob, 107_000 * UNIT)
        .unwrap();
    let payout = second.swap_back.expect("swap-back should fire");
    assert_eq!(payout.tokens_swapped, 10_700 * UNIT);
    assert_eq!(fx.token.tax_balance(), 0);
    assert_eq!(fx.pool.swap_count(), 1);
    assert!(fx.token.ledger().is_conserved());
}

#[test]
fn test_swap_back_fires_at_threshold() {
    let mut fx = launched_with_threshold();
    let (alice, bob) = (holder(1), holder(2));
    fx.fund(alice, 1_000_000 * UNIT);
    let s_before = fx.token.total_sub_lp_balance();
    let pair_before = fx.token.base_balance_of(&PAIR);

    let receipt = fx
        .token
        .transfer(&OpContext::new(alice, 10), &fx.policy, &mut fx.pool, bob, 500_000 * UNIT)
        .unwrap();

    let payout = receipt.swap_back.expect("swap-back should fire");
    assert_eq!(payout.tokens_swapped, 25_000 * UNIT);
    assert!(payout.proceeds > 0);
    assert_eq!(payout.reserve, payout.proceeds * 2_000 / 10_000);
    assert_eq!(fx.pool.swap_count(), 1);

    assert_eq!(fx.token.tax_balance(), 0);
    assert!(fx.token.tax_buckets().is_empty());
    assert_eq!(fx.token.base_balance_of(&PAIR), pair_before + 25_000 * UNIT);
    assert_eq!(fx.token.total_sub_lp_balance(), s_before - 25_000 * UNIT);

    // receivers default to the owner
    assert_eq!(
        fx.token.base_asset_balance_of(&OWNER),
        payout.proceeds - payout.reserve
    );
    assert_eq!(fx.token.burn_engine().state.b2e_reserve, payout.reserve);
    assert_eq!(fx.token.contract_base_balance(), payout.reserve);
    assert_eq!(fx.token.swap_back_controller().state(), SwapState::Idle);
    assert!(fx.token.ledger().is_conserved());
}

#[test]
fn test_swap_back_pays_distinct_receivers() {
    let mut fx = launched_with_threshold();
    let ctx = fx.owner_ctx();
    let receivers = brb_ledger_core::FeeReceivers {
        marketing: holder(100),
        liquidity: holder(101),
        buyback: holder(102),
        treasury: holder(103),
    };
    fx.token
        .set_fee_receivers(&ctx, &fx.policy, receivers)
        .unwrap();

    let (alice, bob) = (holder(1), holder(2));
    fx.fund(alice, 1_000_000 * UNIT);
    let payout = fx
        .token
        .transfer(&OpContext::new(alice, 10), &fx.policy, &mut fx.pool, bob, 500_000 * UNIT)
        .unwrap()
        .swap_back
        .expect("swap-back should fire");

    assert_eq!(fx.token.base_asset_balance_of(&holder(100)), payout.marketing);
    assert_eq!(fx.token.base_asset_balance_of(&holder(101)), payout.liquidity);
    assert_eq!(fx.token.base_asset_balance_of(&holder(102)), payout.buyback);
    assert_eq!(fx.token.base_asset_balance_of(&holder(103)), payout.treasury);
    // default shares 200/100/100/200
    assert!(payout.marketing > payout.liquidity);
    assert_eq!(payout.liquidity, payout.buyback);
    assert_eq!(
        payout.marketing + payout.liquidity + payout.buyback + payout.treasury + payout.reserve,
        payout.proceeds
    );
}

#[test]
fn test_buy_does_not_trigger_swap_back() {
    let mut fx = launched();
    let ctx = fx.owner_ctx();
    fx.token
        .set_swap_back_settings(&ctx, &fx.policy, 1, UNIT)
        .unwrap();
    let alice = holder(1);

    fx.buy(alice, UNIT, 1).unwrap();
    assert!(fx.token.tax_balance() > UNIT);
    assert_eq!(fx.pool.swap_count(), 0);

    // a sell from the holder is not pool-initiated, so it swaps
    let receipt = fx
        .token
        .transfer(&OpContext::new(alice, 2), &fx.policy, &mut fx.pool, PAIR, 1_000 * UNIT)
        .unwrap();
    assert!(receipt.swap_back.is_some());
    assert_eq!(fx.pool.swap_count(), 1);
    assert_eq!(fx.token.tax_balance(), 0);
}

#[test]
fn test_disabled_fees_flag_stops_swap_back() {
    let mut fx = launched();
    let ctx = fx.owner_ctx();
    fx.token
        .set_swap_back_settings(&ctx, &fx.policy, 0, UNIT)
        .unwrap();
    assert_eq!(fx.token.fees_enabled().as_flag(), 0);
    assert_eq!(fx.token.swap_threshold(), UNIT);

    let (alice, bob) = (holder(1), holder(2));
    fx.fund(alice, 1_000_000 * UNIT);
    let receipt = fx
        .token
        .transfer(&OpContext::new(alice, 1), &fx.policy, &mut fx.pool, bob, 100_000 * UNIT)
        .unwrap();
    assert!(receipt.swap_back.is_none());
    assert_eq!(fx.token.tax_balance(), 5_000 * UNIT);
}

#[test]
fn test_failed_swap_back_keeps_tax_and_transfer() {
    let mut fx = launched_with_threshold();
    let (alice, bob) = (holder(1), holder(2));
    fx.fund(alice, 1_000_000 * UNIT);
    fx.pool.set_failing(true);
    let s_before = fx.token.total_sub_lp_balance();

    let receipt = fx
        .token
        .transfer(&OpContext::new(alice, 1), &fx.policy, &mut fx.pool, bob, 500_000 * UNIT)
        .unwrap();

    assert!(receipt.swap_back.is_none());
    assert_eq!(fx.token.base_balance_of(&bob), 470_000 * UNIT);
    assert_eq!(fx.token.tax_balance(), 25_000 * UNIT);
    assert_eq!(fx.token.total_reflected(), 5_000 * UNIT);
    assert_eq!(fx.token.total_sub_lp_balance(), s_before);
    assert_eq!(fx.token.contract_base_balance(), 0);
    assert_eq!(fx.token.swap_back_controller().state(), SwapState::Idle);

    // the retained tax goes out with the next successful attempt
    fx.pool.set_failing(false);
    let payout = fx
        .token
        .transfer(&OpContext::new(alice, 2), &fx.policy, &mut fx.pool, bob, 100 * UNIT)
        .unwrap()
        .swap_back
        .expect("retry should swap");
    assert_eq!(payout.tokens_swapped, 25_000 * UNIT + 5 * UNIT);
    assert_eq!(fx.token.tax_balance(), 0);
}

#[test]
fn test_manual_swap_back_reports_failure() {
    let mut fx = launched();
    let (alice, bob) = (holder(1), holder(2));
    fx.fund(alice, 1_000_000 * UNIT);
    fx.token
        .transfer(&OpContext::new(alice, 1), &fx.policy, &mut fx.pool, bob, 1_000 * UNIT)
        .unwrap();
    let tax = fx.token.tax_balance();
    assert_eq!(tax, 50 * UNIT);

    let stranger = OpContext::new(holder(9), 2);
    assert_eq!(
        fx.token.swap_back(&stranger, &fx.policy, &mut fx.pool),
        Err(LedgerError::Unauthorized { caller: holder(9) })
    );

    fx.pool.set_failing(true);
    let ctx = fx.owner_ctx();
    assert_eq!(
        fx.token.swap_back(&ctx, &fx.policy, &mut fx.pool),
        Err(LedgerError::SwapBackFailed(ExchangeError::Rejected(
            "injected failure".to_string()
        )))
    );
    assert_eq!(fx.token.tax_balance(), tax);
    assert_eq!(fx.token.swap_back_controller().state(), SwapState::Idle);

    fx.pool.set_failing(false);
    let payout = fx
        .token
        .swap_back(&ctx, &fx.policy, &mut fx.pool)
        .unwrap()
        .expect("tax below threshold still swaps on demand");
    assert_eq!(payout.tokens_swapped, tax);
}

#[test]
fn test_swap_in_progress_blocks_nested_swap() {
    let mut fx = launched_with_threshold();
    let (alice, bob) = (holder(1), holder(2));
    fx.fund(alice, 2_000_000 * UNIT);

    fx.token
        .swap_back_controller_mut()
        .force_state(SwapState::Swapping);
    for now in 1..=2 {
        let receipt = fx
            .token
            .transfer(&OpContext::new(alice, now), &fx.policy, &mut fx.pool, bob, 500_000 * UNIT)
            .unwrap();
        assert!(receipt.swap_back.is_none());
    }
    assert_eq!(fx.pool.swap_count(), 0);
    assert_eq!(fx.token.tax_balance(), 50_000 * UNIT);

    let ctx = fx.owner_ctx();
    assert_eq!(fx.token.swap_back(&ctx, &fx.policy, &mut fx.pool), Ok(None));

    fx.token
        .swap_back_controller_mut()
        .force_state(SwapState::Idle);
    let payout = fx
        .token
        .transfer(&OpContext::new(alice, 3), &fx.policy, &mut fx.pool, bob, 100 * UNIT)
        .unwrap()
        .swap_back
        .expect("idle controller should swap");

    // the whole accumulated balance is spent exactly once
    assert_eq!(payout.tokens_swapped, 50_000 * UNIT + 5 * UNIT);
    assert_eq!(fx.pool.swap_count(), 1);
    assert_eq!(fx.token.tax_balance(), 0);
    assert!(fx.token.ledger().is_conserved());
}

// ============================================================================
// Limit Guard
// ============================================================================

#[test]
fn test_buy_over_max_tx_rejected() {
    let mut fx = launched();
    let alice = holder(1);
    let before = fx.token.clone();

    let err = fx.buy(alice, 20 * UNIT, 1).unwrap_err();
    assert!(matches!(err, LedgerError::TxLimitExceeded { max_tx, .. } if max_tx == 10_000_000 * UNIT));
    assert_eq!(fx.token, before);
}

#[test]
fn test_buy_over_max_wallet_rejected() {
    let mut fx = launched();
    let alice = holder(1);
    fx.fund(alice, 19_900_000 * UNIT);

    let err = fx.buy(alice, UNIT, 1).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::WalletLimitExceeded { max_wallet, .. } if max_wallet == 20_000_000 * UNIT
    ));
}

#[test]
fn test_sell_skips_wallet_limit_but_not_max_tx() {
    let mut fx = launched();
    let alice = holder(1);
    fx.fund(alice, 21_000_000 * UNIT);

    fx.token
        .transfer(&OpContext::new(alice, 1), &fx.policy, &mut fx.pool, PAIR, 9_000_000 * UNIT)
        .unwrap();
    let err = fx
        .token
        .transfer(&OpContext::new(alice, 2), &fx.policy, &mut fx.pool, PAIR, 10_000_001 * UNIT)
        .unwrap_err();
    assert!(matches!(err, LedgerError::TxLimitExceeded { .. }));
}

#[test]
fn test_limit_exemption_and_toggle() {
    let mut fx = launched();
    let alice = holder(1);
    let ctx = fx.owner_ctx();
    fx.fund(alice, 19_900_000 * UNIT);

    fx.policy.set_limit_exempt(&ctx, alice, true).unwrap();
    fx.buy(alice, UNIT, 1).unwrap();
    fx.policy.set_limit_exempt(&ctx, alice, false).unwrap();
    assert!(fx.buy(alice, UNIT, 2).is_err());

    fx.token
        .set_limits(&ctx, &fx.policy, LimitConfig::disabled())
        .unwrap();
    fx.buy(alice, 20 * UNIT, 3).unwrap();
    assert!(fx.token.ledger().is_conserved());
}

// ============================================================================
// Burn-to-Earn
// ============================================================================

#[test]
fn test_burn_to_earn_flow() {
    let mut fx = launched();
    let (alice, bob) = (holder(1), holder(2));
    fx.token.fund_burn_reserve(10 * UNIT);
    fx.fund(alice, 1_000_000 * UNIT);

    // pool prices one base at 750,000 tokens
    let info = fx.token.burn_to_earn_info(100, &fx.pool);
    assert_eq!(info.b2e_reserve, 10 * UNIT);
    assert_eq!(info.burn_cap_in_eth, UNIT);
    assert_eq!(info.max_eth_output, UNIT);
    assert_eq!(info.max_tokens_to_burn, 750_000 * UNIT);
    assert_eq!(info.time_to_next_burn, 0);

    let supply_before = fx.token.total_supply();
    let s_before = fx.token.total_sub_lp_balance();
    let receipt = fx
        .token
        .burn_to_earn(&OpContext::new(alice, 100), &fx.policy, &fx.pool, 375_000 * UNIT)
        .unwrap();

    assert_eq!(receipt.reward, UNIT / 2);
    assert_eq!(fx.token.total_supply(), supply_before - 375_000 * UNIT);
    assert_eq!(fx.token.total_sub_lp_balance(), s_before - 375_000 * UNIT);
    assert_eq!(fx.token.base_balance_of(&alice), 625_000 * UNIT);
    assert_eq!(fx.token.base_asset_balance_of(&alice), UNIT / 2);

    let info = fx.token.burn_to_earn_info(200, &fx.pool);
    assert_eq!(info.total_burned, 375_000 * UNIT);
    assert_eq!(info.total_burn_rewards, UNIT / 2);
    assert_eq!(info.b2e_reserve, 9 * UNIT + UNIT / 2);
    assert_eq!(info.time_to_next_burn, 3_500);
    assert!(fx.token.ledger().is_conserved());

    assert_eq!(
        fx.token
            .burn_to_earn(&OpContext::new(alice, 200), &fx.policy, &fx.pool, UNIT),
        Err(LedgerError::BurnCooldownActive { remaining_secs: 3_500 })
    );

    let later = 100 + 3_600;
    assert_eq!(
        fx.token
            .burn_to_earn(&OpContext::new(alice, later), &fx.policy, &fx.pool, 800_000 * UNIT),
        Err(LedgerError::BurnCapExceeded {
            requested: 800_000 * UNIT,
            cap: 712_500 * UNIT
        })
    );
    assert_eq!(
        fx.token
            .burn_to_earn(&OpContext::new(bob, later), &fx.policy, &fx.pool, UNIT),
        Err(LedgerError::InsufficientBalance {
            available: 0,
            requested: UNIT
        })
    );
    assert_eq!(
        fx.token
            .burn_to_earn(&OpContext::new(alice, later), &fx.policy, &fx.pool, 0),
        Err(LedgerError::ZeroAmount)
    );
}

#[test]
fn test_swap_back_funds_burn_reserve() {
    let mut fx = launched_with_threshold();
    let (alice, bob) = (holder(1), holder(2));
    fx.fund(alice, 1_000_000 * UNIT);
    let payout = fx
        .token
        .transfer(&OpContext::new(alice, 1), &fx.policy, &mut fx.pool, bob, 500_000 * UNIT)
        .unwrap()
        .swap_back
        .expect("swap-back should fire");

    let info = fx.token.burn_to_earn_info(1, &fx.pool);
    assert_eq!(info.b2e_reserve, payout.reserve);
    assert!(info.max_tokens_to_burn > 0);

    // the reserve cannot be swept
    let ctx = fx.owner_ctx();
    assert_eq!(fx.token.clear_stuck_balance(&ctx, &fx.policy), Ok(0));
    assert_eq!(fx.token.contract_base_balance(), payout.reserve);
}

// ============================================================================
// Administration
// ============================================================================

#[test]
fn test_fee_change_bounds() {
    let mut fx = launched();
    let ctx = fx.owner_ctx();
    let too_high = FeeSchedule::new(FeeShares::new(1_000, 1_000, 1_000, 1_000));
    assert!(matches!(
        fx.token
            .change_fees(&ctx, &fx.policy, FeeSchedule::default(), too_high),
        Err(LedgerError::FeeTooHigh { total: 4_000, .. })
    ));
    assert_eq!(fx.token.sell_fee(), &FeeSchedule::default());

    let zero = FeeSchedule::new(FeeShares::default());
    fx.token.change_fees(&ctx, &fx.policy, zero, zero).unwrap();

    // with no schedule fee the reflection slice is capped at zero too
    let (alice, bob) = (holder(1), holder(2));
    fx.fund(alice, 100 * UNIT);
    fx.token
        .transfer(&OpContext::new(alice, 1), &fx.policy, &mut fx.pool, bob, 100 * UNIT)
        .unwrap();
    assert_eq!(fx.token.base_balance_of(&bob), 100 * UNIT);
    assert_eq!(fx.token.total_reflected(), 0);
}

#[test]
fn test_owner_surface_rejects_strangers() {
    let mut fx = launched();
    let stranger = holder(7);
    let ctx = OpContext::new(stranger, 0);
    let unauthorized = Err(LedgerError::Unauthorized { caller: stranger });

    assert_eq!(
        fx.token
            .change_fees(&ctx, &fx.policy, FeeSchedule::default(), FeeSchedule::default()),
        unauthorized
    );
    assert_eq!(
        fx.token.set_swap_back_settings(&ctx, &fx.policy, 0, 0),
        unauthorized
    );
    assert_eq!(
        fx.token
            .set_fee_receivers(&ctx, &fx.policy, brb_ledger_core::FeeReceivers::all(stranger)),
        unauthorized
    );
    assert_eq!(
        fx.token
            .set_limits(&ctx, &fx.policy, LimitConfig::disabled()),
        unauthorized
    );
    assert_eq!(
        fx.token
            .set_liquidity_pair(&ctx, &mut fx.policy, stranger, true),
        unauthorized
    );
    assert_eq!(
        fx.token
            .clear_stuck_token(&ctx, &fx.policy, holder(8))
            .map(|_| ()),
        unauthorized
    );
}
