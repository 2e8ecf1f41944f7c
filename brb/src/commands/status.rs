use anyhow::Result;
use brb_ledger_core::FeeSchedule;
use std::path::Path;

use crate::amount::format_amount;
use crate::commands::{unix_now, Session};
use crate::state::LedgerState;

/// Show token, fee, swap-back and burn-to-earn status
pub fn run(config_path: &Path, state_path: &Path) -> Result<()> {
    let session = Session::open(config_path, state_path)?;
    let LedgerState { token, policy, pool } = &session.state;
    let now = unix_now()?;

    println!();
    println!("=== BRB Status ===");
    println!();
    println!("Token:");
    println!("  Contract: {}", token.address());
    println!("  Owner: {}", policy.owner());
    println!("  Total supply: {}", format_amount(token.total_supply()));
    println!("  Total reflected (R): {}", format_amount(token.total_reflected()));
    println!("  Sub-LP balance (S): {}", format_amount(token.total_sub_lp_balance()));
    println!("  Holders: {}", token.ledger().holders().count());
    if policy.in_grace_window(now) {
        println!(
            "  Grace window: open until {}",
            policy.activated_at() + policy.grace_period_secs()
        );
    }
    println!();
    println!("Fees:");
    println!("  Buy:  {}", describe_schedule(token.buy_fee()));
    println!("  Sell: {}", describe_schedule(token.sell_fee()));
    println!();
    let limits = token.limits();
    println!("Limits:");
    if limits.enabled {
        println!("  Max transaction: {}", format_amount(limits.max_tx));
        println!("  Max wallet: {}", format_amount(limits.max_wallet));
    } else {
        println!("  (disabled)");
    }
    println!();
    let controller = token.swap_back_controller();
    println!("Swap-back:");
    println!(
        "  Enabled: {}",
        if token.fees_enabled().is_enabled() { "yes" } else { "no" }
    );
    println!("  Threshold: {}", format_amount(token.swap_threshold()));
    println!("  Tax balance: {}", format_amount(token.tax_balance()));
    println!("  State: {:?}", controller.state());
    println!("  Receivers:");
    let receivers = controller.receivers;
    println!("    marketing {}", receivers.marketing);
    println!("    liquidity {}", receivers.liquidity);
    println!("    buyback   {}", receivers.buyback);
    println!("    treasury  {}", receivers.treasury);
    println!();
    let info = token.burn_to_earn_info(now, pool);
    println!("Burn-to-earn:");
    println!("  Reserve: {}", format_amount(info.b2e_reserve));
    println!("  Total burned: {}", format_amount(info.total_burned));
    println!("  Total rewards: {}", format_amount(info.total_burn_rewards));
    println!("  Max tokens per burn: {}", format_amount(info.max_tokens_to_burn));
    println!("  Max reward per burn: {}", format_amount(info.max_eth_output));
    println!("  Next burn in: {}s", info.time_to_next_burn);
    println!();
    println!("Pool:");
    println!("  Pair: {}", session.accounts.pair);
    println!("  Token reserve: {}", format_amount(session.state.pool_token_reserve()));
    println!("  Base reserve: {}", format_amount(session.state.pool_base_reserve()));
    println!();

    Ok(())
}

fn describe_schedule(schedule: &FeeSchedule) -> String {
    let s = &schedule.shares;
    format!(
        "{} bps (marketing {}, liquidity {}, buyback {}, treasury {})",
        schedule.total, s.marketing, s.liquidity, s.buyback, s.treasury
    )
}
