use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use crate::amount::format_amount;
use crate::commands::{parse_address, parse_token_amount, print_receipt, Session};

/// Buy tokens from the simulated pool for `base_in` base asset
pub fn run(config_path: &Path, state_path: &Path, to: &str, base_in: &str) -> Result<()> {
    let mut session = Session::open(config_path, state_path)?;
    let to = parse_address(to)?;
    let base_in = parse_token_amount(base_in)?;

    // The pair is the sender and the caller of a buy.
    let ctx = session.ctx(session.accounts.pair)?;
    let state = &mut session.state;
    let tokens_out = state.pool.quote_tokens_out(base_in);
    if tokens_out == 0 {
        bail!("Pool returns nothing for {} base", format_amount(base_in));
    }

    let receipt = state
        .token
        .transfer(&ctx, &state.policy, &mut state.pool, to, tokens_out)
        .context("Buy rejected")?;
    state.pool.buy(base_in).context("Pool rejected buy")?;
    session.save()?;

    info!(%to, base_in, tokens_out, "Buy committed");
    print_receipt(&receipt);
    Ok(())
}
