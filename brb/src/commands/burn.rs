use anyhow::{Context, Result};
use std::path::Path;

use crate::amount::format_amount;
use crate::commands::{parse_address, parse_token_amount, Session};

/// Burn tokens for a base-asset reward from the burn-to-earn reserve
pub fn run(config_path: &Path, state_path: &Path, from: &str, amount: &str) -> Result<()> {
    let mut session = Session::open(config_path, state_path)?;
    let from = parse_address(from)?;
    let amount = parse_token_amount(amount)?;

    let ctx = session.ctx(from)?;
    let state = &mut session.state;
    let receipt = state
        .token
        .burn_to_earn(&ctx, &state.policy, &state.pool, amount)
        .context("Burn rejected")?;
    session.save()?;

    let info = session.state.token.burn_to_earn_info(ctx.now, &session.state.pool);
    println!("Burned: {}", format_amount(receipt.burned));
    println!("Reward: {}", format_amount(receipt.reward));
    println!("Reserve left: {}", format_amount(info.b2e_reserve));
    println!("Next burn in: {}s", info.time_to_next_burn);
    Ok(())
}
