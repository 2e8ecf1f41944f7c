use anyhow::Result;
use std::path::Path;

use crate::amount::format_amount;
use crate::commands::{parse_address, parse_token_amount, Session};

/// Set `spender`'s allowance over `owner`'s tokens
pub fn run(
    config_path: &Path,
    state_path: &Path,
    owner: &str,
    spender: &str,
    amount: &str,
) -> Result<()> {
    let mut session = Session::open(config_path, state_path)?;
    let owner = parse_address(owner)?;
    let spender = parse_address(spender)?;
    let amount = parse_token_amount(amount)?;

    let ctx = session.ctx(owner)?;
    session.state.token.approve(&ctx, spender, amount);
    session.save()?;

    println!(
        "Allowance for {} over {}: {}",
        spender,
        owner,
        format_amount(session.state.token.allowance(&owner, &spender))
    );
    Ok(())
}
