use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::amount::format_amount;
use crate::commands::{parse_address, print_receipt, resolve_amount, Session};

/// Sell tokens from `from` into the simulated pool; without an amount, sell
/// the whole reported balance
pub fn run(config_path: &Path, state_path: &Path, from: &str, amount: Option<&str>) -> Result<()> {
    let mut session = Session::open(config_path, state_path)?;
    let from = parse_address(from)?;
    let amount = resolve_amount(&session, &from, amount)?;
    let pair = session.accounts.pair;

    let ctx = session.ctx(from)?;
    let state = &mut session.state;
    let receipt = state
        .token
        .transfer(&ctx, &state.policy, &mut state.pool, pair, amount)
        .context("Sell rejected")?;
    let base_out = state
        .pool
        .sell(receipt.split.net)
        .context("Pool rejected sell")?;
    session.save()?;

    info!(%from, amount, base_out, "Sell committed");
    print_receipt(&receipt);
    println!("Base received: {}", format_amount(base_out));
    Ok(())
}
