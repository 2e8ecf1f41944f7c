use anyhow::Result;
use brb_ledger_core::UNIT;
use std::path::Path;

use crate::amount::format_amount;
use crate::commands::{parse_address, Session};

/// Show an account's balances and flags
pub fn run(config_path: &Path, state_path: &Path, address: &str) -> Result<()> {
    let session = Session::open(config_path, state_path)?;
    let address = parse_address(address)?;
    let state = &session.state;
    let account = state.token.account(&address, &state.policy);

    println!();
    println!("=== Account {} ===", account.address);
    println!("Balance: {}", format_amount(account.effective_balance));
    println!("         {} base units (ledger)", account.base_balance);
    println!(
        "Reflection earned: {}",
        format_amount(account.effective_balance - account.base_balance)
    );
    println!(
        "Spendable: {} base units for the full balance",
        state
            .token
            .reflection_to_base_amount(account.effective_balance, &address, &state.policy)
    );
    println!(
        "1 token held reports as {}",
        format_amount(state.token.base_to_reflection_amount(UNIT, &address, &state.policy))
    );
    println!(
        "Base asset: {}",
        format_amount(state.token.base_asset_balance_of(&address))
    );

    let flags = account.flags;
    let mut labels = Vec::new();
    if flags.is_liquidity_pair {
        labels.push("liquidity pair");
    }
    if flags.excluded_from_fee {
        labels.push("fee exempt");
    }
    if flags.excluded_from_limits {
        labels.push("limit exempt");
    }
    if flags.grace_exempt {
        labels.push("grace exempt");
    }
    if address == state.policy.owner() {
        labels.push("owner");
    }
    if !labels.is_empty() {
        println!("Flags: {}", labels.join(", "));
    }
    println!();

    Ok(())
}
