use anyhow::Result;
use std::path::Path;

use crate::amount::format_amount;
use crate::commands::{parse_token_amount, Session};

/// Deposit base asset into the burn-to-earn reserve
pub fn run(config_path: &Path, state_path: &Path, amount: &str) -> Result<()> {
    let mut session = Session::open(config_path, state_path)?;
    let amount = parse_token_amount(amount)?;

    session.state.token.fund_burn_reserve(amount);
    session.save()?;

    println!(
        "Burn reserve: {}",
        format_amount(session.state.token.burn_engine().state.b2e_reserve)
    );
    Ok(())
}
