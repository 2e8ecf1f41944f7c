//! Owner-only administration.
//!
//! Every subcommand runs as the configured owner unless `--as` names another
//! caller, in which case the ledger's access policy decides.

use anyhow::{bail, Context, Result};
use brb_ledger_core::{Address, FeeReceivers, FeeSchedule, LimitConfig, OpContext};
use clap::Subcommand;
use std::path::Path;
use tracing::info;

use crate::amount::format_amount;
use crate::commands::{parse_address, parse_token_amount, Session};
use crate::config::shares;

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Replace the buy and sell fee schedules
    ChangeFees {
        /// Buy shares in bps: marketing,liquidity,buyback,treasury
        #[arg(long)]
        buy: String,

        /// Sell shares in bps: marketing,liquidity,buyback,treasury
        #[arg(long)]
        sell: String,
    },

    /// Set the addresses paid from swap-back proceeds
    SetReceivers {
        #[arg(long)]
        marketing: String,
        #[arg(long)]
        liquidity: String,
        #[arg(long)]
        buyback: String,
        #[arg(long)]
        treasury: String,
    },

    /// Run a swap-back now, or change its settings when a flag is given
    SwapBack {
        /// 1 enables automatic swap-back, any other value disables it
        #[arg(long)]
        flag: Option<u8>,

        /// Tax balance that triggers a swap-back (tokens)
        #[arg(long)]
        threshold: Option<String>,
    },

    /// Change transaction and wallet limits
    Limits {
        #[arg(long)]
        enabled: Option<bool>,

        /// Per-transaction cap (tokens)
        #[arg(long)]
        max_tx: Option<String>,

        /// Per-wallet cap (tokens)
        #[arg(long)]
        max_wallet: Option<String>,
    },

    /// Change an account's fee, limit or grace exemptions
    Exempt {
        address: String,

        #[arg(long)]
        fee: Option<bool>,

        #[arg(long)]
        limits: Option<bool>,

        #[arg(long)]
        grace: Option<bool>,
    },

    /// Flag an account as a liquidity pair
    Pair {
        address: String,

        /// Remove the flag instead
        #[arg(long)]
        remove: bool,
    },

    /// Send base asset not reserved for burn-to-earn to the owner
    SweepBalance,

    /// Send a foreign token's full holding to the owner
    SweepToken { token: String },
}

/// Run an admin subcommand
pub fn run(
    config_path: &Path,
    state_path: &Path,
    caller: Option<&str>,
    command: AdminCommand,
) -> Result<()> {
    let mut session = Session::open(config_path, state_path)?;
    let caller = match caller {
        Some(caller) => parse_address(caller)?,
        None => session.accounts.owner,
    };
    let ctx = session.ctx(caller)?;

    execute(&mut session, &ctx, command)?;
    session.save()
}

fn execute(session: &mut Session, ctx: &OpContext, command: AdminCommand) -> Result<()> {
    let state = &mut session.state;
    let token = &mut state.token;

    match command {
        AdminCommand::ChangeFees { buy, sell } => {
            let buy = FeeSchedule::new(shares(parse_shares(&buy)?));
            let sell = FeeSchedule::new(shares(parse_shares(&sell)?));
            token
                .change_fees(ctx, &state.policy, buy, sell)
                .context("Fee change rejected")?;
            println!("Fees: buy {} bps, sell {} bps", buy.total, sell.total);
        }
        AdminCommand::SetReceivers {
            marketing,
            liquidity,
            buyback,
            treasury,
        } => {
            let receivers = FeeReceivers {
                marketing: parse_address(&marketing)?,
                liquidity: parse_address(&liquidity)?,
                buyback: parse_address(&buyback)?,
                treasury: parse_address(&treasury)?,
            };
            token
                .set_fee_receivers(ctx, &state.policy, receivers)
                .context("Receiver change rejected")?;
            println!("Fee receivers updated.");
        }
        AdminCommand::SwapBack {
            flag: None,
            threshold: None,
        } => {
            let payout = token
                .swap_back(ctx, &state.policy, &mut state.pool)
                .context("Swap-back failed")?;
            match payout {
                Some(payout) => {
                    info!(tokens = payout.tokens_swapped, proceeds = payout.proceeds, "Manual swap-back");
                    println!("Swapped {} tokens", format_amount(payout.tokens_swapped));
                    println!("  Proceeds:  {}", format_amount(payout.proceeds));
                    println!("  Reserve:   {}", format_amount(payout.reserve));
                    println!("  Marketing: {}", format_amount(payout.marketing));
                    println!("  Liquidity: {}", format_amount(payout.liquidity));
                    println!("  Buyback:   {}", format_amount(payout.buyback));
                    println!("  Treasury:  {}", format_amount(payout.treasury));
                }
                None => println!("Nothing to swap."),
            }
        }
        AdminCommand::SwapBack { flag, threshold } => {
            let flag = flag.unwrap_or_else(|| token.fees_enabled().as_flag());
            let threshold = match threshold {
                Some(value) => parse_token_amount(&value)?,
                None => token.swap_threshold(),
            };
            token
                .set_swap_back_settings(ctx, &state.policy, flag, threshold)
                .context("Swap-back settings rejected")?;
            println!(
                "Swap-back {} at {}",
                if token.fees_enabled().is_enabled() { "enabled" } else { "disabled" },
                format_amount(threshold)
            );
        }
        AdminCommand::Limits {
            enabled,
            max_tx,
            max_wallet,
        } => {
            let current = *token.limits();
            let limits = LimitConfig {
                enabled: enabled.unwrap_or(current.enabled),
                max_tx: optional_amount(max_tx.as_deref(), current.max_tx)?,
                max_wallet: optional_amount(max_wallet.as_deref(), current.max_wallet)?,
            };
            token
                .set_limits(ctx, &state.policy, limits)
                .context("Limit change rejected")?;
            println!(
                "Limits {}: max tx {}, max wallet {}",
                if limits.enabled { "enabled" } else { "disabled" },
                format_amount(limits.max_tx),
                format_amount(limits.max_wallet)
            );
        }
        AdminCommand::Exempt {
            address,
            fee,
            limits,
            grace,
        } => {
            if fee.is_none() && limits.is_none() && grace.is_none() {
                bail!("Nothing to change: pass --fee, --limits or --grace");
            }
            let account = parse_address(&address)?;
            let policy = &mut state.policy;
            if let Some(exempt) = fee {
                policy.set_fee_exempt(ctx, account, exempt)?;
            }
            if let Some(exempt) = limits {
                policy.set_limit_exempt(ctx, account, exempt)?;
            }
            if let Some(exempt) = grace {
                policy.set_grace_exempt(ctx, account, exempt)?;
            }
            println!("{} flags: {:?}", account, policy.flags(&account));
        }
        AdminCommand::Pair { address, remove } => {
            let account: Address = parse_address(&address)?;
            token
                .set_liquidity_pair(ctx, &mut state.policy, account, !remove)
                .context("Pair change rejected")?;
            println!(
                "{} {} liquidity pair (S = {})",
                account,
                if remove { "is no longer a" } else { "is now a" },
                format_amount(token.total_sub_lp_balance())
            );
        }
        AdminCommand::SweepBalance => {
            let amount = token
                .clear_stuck_balance(ctx, &state.policy)
                .context("Sweep rejected")?;
            println!("Swept {} base asset to the owner", format_amount(amount));
        }
        AdminCommand::SweepToken { token: foreign } => {
            let foreign = parse_address(&foreign)?;
            let amount = token
                .clear_stuck_token(ctx, &state.policy, foreign)
                .context("Sweep rejected")?;
            println!("Swept {} of {} to the owner", format_amount(amount), foreign);
        }
    }

    Ok(())
}

/// Parse `"200,100,100,200"` into four basis-point shares.
pub fn parse_shares(value: &str) -> Result<[u32; 4]> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid share {part:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    match parts.as_slice() {
        [marketing, liquidity, buyback, treasury] => {
            Ok([*marketing, *liquidity, *buyback, *treasury])
        }
        _ => bail!("Expected 4 comma-separated shares, got {}", parts.len()),
    }
}

fn optional_amount(value: Option<&str>, current: u128) -> Result<u128> {
    value.map_or(Ok(current), parse_token_amount)
}
