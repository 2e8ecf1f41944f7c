use anyhow::{Context, Result};
use brb_ledger_core::{Address, OpContext, TransferReceipt};
use std::path::Path;
use tracing::info;

use crate::commands::{parse_address, print_receipt, resolve_amount, Session};

/// Transfer tokens from `from` to `to`; without an amount, send everything
pub fn run(
    config_path: &Path,
    state_path: &Path,
    from: &str,
    to: &str,
    amount: Option<&str>,
) -> Result<()> {
    let mut session = Session::open(config_path, state_path)?;
    let from = parse_address(from)?;
    let to = parse_address(to)?;
    let amount = resolve_amount(&session, &from, amount)?;

    let ctx = session.ctx(from)?;
    let receipt = execute(&mut session, &ctx, None, to, amount)?;
    session.save()?;

    info!(%from, %to, amount, "Transfer committed");
    print_receipt(&receipt);
    Ok(())
}

/// Transfer on behalf of `from` using `spender`'s allowance
pub fn run_from(
    config_path: &Path,
    state_path: &Path,
    spender: &str,
    from: &str,
    to: &str,
    amount: Option<&str>,
) -> Result<()> {
    let mut session = Session::open(config_path, state_path)?;
    let spender = parse_address(spender)?;
    let from = parse_address(from)?;
    let to = parse_address(to)?;
    let amount = resolve_amount(&session, &from, amount)?;

    let ctx = session.ctx(spender)?;
    let receipt = execute(&mut session, &ctx, Some(from), to, amount)?;
    session.save()?;

    info!(%spender, %from, %to, amount, "Delegated transfer committed");
    print_receipt(&receipt);
    Ok(())
}

/// Apply a transfer (delegated when `from` is given) and keep the simulated
/// pool in line with the pair's ledger balance.
fn execute(
    session: &mut Session,
    ctx: &OpContext,
    from: Option<Address>,
    to: Address,
    amount: u128,
) -> Result<TransferReceipt> {
    let state = &mut session.state;
    let receipt = match from {
        Some(from) => state
            .token
            .transfer_from(ctx, &state.policy, &mut state.pool, from, to, amount),
        None => state
            .token
            .transfer(ctx, &state.policy, &mut state.pool, to, amount),
    }
    .context("Transfer rejected")?;
    state.sync_pool_reserve();
    Ok(receipt)
}
