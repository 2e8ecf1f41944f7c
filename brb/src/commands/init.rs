use anyhow::{bail, Context, Result};
use brb_ledger_core::{ConstantProductPool, OpContext, ReflectionToken, BPS_DENOMINATOR, UNIT};
use std::path::Path;
use tracing::info;

use crate::amount::format_amount;
use crate::commands::unix_now;
use crate::config::Config;
use crate::state::LedgerState;

/// Run the init command
pub fn run(config_path: &Path, state_path: &Path, force: bool) -> Result<()> {
    if state_path.exists() && !force {
        bail!(
            "Ledger state already exists at {}\nUse --force to overwrite it.",
            state_path.display()
        );
    }

    let config = if Config::exists(config_path) {
        Config::load(config_path)?
    } else {
        let config = Config::default();
        config.save(config_path)?;
        println!("Default config written to: {}", config_path.display());
        config
    };

    let state = launch(&config, unix_now()?)?;
    state.save(state_path).with_context(|| {
        format!("Failed to write ledger state to {}", state_path.display())
    })?;

    info!(path = %state_path.display(), "Ledger initialized");
    println!();
    println!("Token launched.");
    println!("  Owner:     {}", state.policy.owner());
    println!("  Contract:  {}", state.token.address());
    println!("  Supply:    {}", format_amount(state.token.total_supply()));
    println!(
        "  Pool:      {} tokens / {} base",
        format_amount(state.pool_token_reserve()),
        format_amount(state.pool_base_reserve())
    );
    println!("State saved to: {}", state_path.display());

    Ok(())
}

/// Create the token, register the pair and seed the pool from the owner.
pub fn launch(config: &Config, now: u64) -> Result<LedgerState> {
    let accounts = config.accounts()?;
    let token_config = config.token_config()?;
    let liquidity =
        token_config.total_supply / BPS_DENOMINATOR * config.pool.token_liquidity_bps as u128;
    let base_liquidity = (config.pool.base_liquidity as u128)
        .checked_mul(UNIT)
        .context("pool.base_liquidity out of range")?;

    let (mut token, mut policy) =
        ReflectionToken::create(accounts.contract, accounts.owner, token_config, now)
            .context("Invalid token configuration")?;
    let mut pool = ConstantProductPool::new(accounts.pair, 0, base_liquidity)
        .with_fee_bps(config.pool.fee_bps);

    let ctx = OpContext::new(accounts.owner, now);
    token
        .set_liquidity_pair(&ctx, &mut policy, accounts.pair, true)
        .context("Failed to register liquidity pair")?;
    token
        .add_liquidity(&ctx, &policy, accounts.pair, liquidity)
        .context("Failed to seed pool liquidity")?;
    pool.sync_token_reserve(liquidity);

    Ok(LedgerState {
        token,
        policy,
        pool,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use brb_ledger_core::DEFAULT_TOTAL_SUPPLY;

    #[test]
    fn test_launch_with_defaults() {
        let config = Config::default();
        let accounts = config.accounts().unwrap();
        let state = launch(&config, 1_000).unwrap();

        assert_eq!(state.token.total_supply(), DEFAULT_TOTAL_SUPPLY);
        assert!(state.policy.is_liquidity_pair(&accounts.pair));
        assert_eq!(
            state.token.base_balance_of(&accounts.pair),
            DEFAULT_TOTAL_SUPPLY / 4 * 3
        );
        assert_eq!(state.pool_token_reserve(), DEFAULT_TOTAL_SUPPLY / 4 * 3);
        assert_eq!(state.pool_base_reserve(), 1_000 * UNIT);
        assert_eq!(
            state.token.total_sub_lp_balance(),
            DEFAULT_TOTAL_SUPPLY / 4
        );
        assert_eq!(state.policy.activated_at(), 1_000);
        assert_eq!(state.token.total_reflected(), 0);
        assert_eq!(state.token.tax_balance(), 0);
        assert!(!state.policy.is_excluded_from_fee(&accounts.owner));
    }

    #[test]
    fn test_launch_rejects_excessive_fees() {
        let mut config = Config::default();
        config.fees.sell = [2_000, 1_000, 0, 0];
        assert!(launch(&config, 0).is_err());
    }
}
