//! CLI command implementations.
//!
//! These modules implement the user-facing CLI commands and legitimately
//! use stdout for output.

#![allow(clippy::print_stdout)]

pub mod admin;
pub mod approve;
pub mod balance;
pub mod burn;
pub mod buy;
pub mod fund_reserve;
pub mod init;
pub mod sell;
pub mod status;
pub mod transfer;

use anyhow::{Context, Result};
use brb_ledger_core::{Address, OpContext, TransferReceipt};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::amount::{format_amount, parse_amount};
use crate::config::{Accounts, Config};
use crate::state::LedgerState;

/// Config and state loaded for one command invocation.
pub struct Session {
    pub config: Config,
    pub accounts: Accounts,
    pub state: LedgerState,
    state_path: PathBuf,
}

impl Session {
    pub fn open(config_path: &Path, state_path: &Path) -> Result<Self> {
        let config = Config::load(config_path).context("No config found. Run 'brb init' first.")?;
        let accounts = config.accounts()?;
        let state = LedgerState::load(state_path).with_context(|| {
            format!(
                "Failed to load ledger state from {}. Run 'brb init' first.",
                state_path.display()
            )
        })?;
        Ok(Self {
            config,
            accounts,
            state,
            state_path: state_path.to_path_buf(),
        })
    }

    #[cfg(test)]
    pub fn in_memory(config: Config, accounts: Accounts, state: LedgerState) -> Self {
        Self {
            config,
            accounts,
            state,
            state_path: PathBuf::new(),
        }
    }

    /// Operation context for `caller` at the current time.
    pub fn ctx(&self, caller: Address) -> Result<OpContext> {
        Ok(OpContext::new(caller, unix_now()?))
    }

    pub fn save(&self) -> Result<()> {
        self.state
            .save(&self.state_path)
            .with_context(|| format!("Failed to save ledger state to {}", self.state_path.display()))
    }
}

/// Seconds since the Unix epoch.
pub fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock is before the Unix epoch")?
        .as_secs())
}

pub fn parse_address(value: &str) -> Result<Address> {
    value
        .parse()
        .with_context(|| format!("Invalid address: {value:?}"))
}

pub fn parse_token_amount(value: &str) -> Result<u128> {
    parse_amount(value).with_context(|| format!("Invalid amount: {value:?}"))
}

/// Base units to move for a `--amount`, or for the sender's whole reported
/// balance when no amount is given.
pub fn resolve_amount(session: &Session, from: &Address, amount: Option<&str>) -> Result<u128> {
    match amount {
        Some(amount) => parse_token_amount(amount),
        None => {
            let state = &session.state;
            let reported = state.token.balance_of(from, &state.policy);
            Ok(state
                .token
                .reflection_to_base_amount(reported, from, &state.policy))
        }
    }
}

/// Print the fee split and any swap-back a transfer produced.
pub fn print_receipt(receipt: &TransferReceipt) {
    let split = &receipt.split;
    println!("Transfer ({:?}):", split.kind);
    println!("  Amount:     {}", format_amount(split.amount));
    println!("  Fee:        {}", format_amount(split.fee));
    println!("  Reflection: {}", format_amount(split.reflection));
    println!("  Tax:        {}", format_amount(split.tax));
    println!("  Received:   {}", format_amount(split.net));
    if let Some(payout) = &receipt.swap_back {
        println!("Swap-back:");
        println!("  Tokens swapped: {}", format_amount(payout.tokens_swapped));
        println!("  Proceeds:       {}", format_amount(payout.proceeds));
        println!("  To reserve:     {}", format_amount(payout.reserve));
    }
}
