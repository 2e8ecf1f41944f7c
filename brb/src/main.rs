use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use brb::commands::admin::AdminCommand;
use brb::{commands, config, telemetry};

#[derive(Parser)]
#[command(name = "brb")]
#[command(about = "Operate a reflection token ledger", long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.brb/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the ledger state file (default: ledger.brb next to the config)
    #[arg(long, global = true)]
    state: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config if needed and launch the token
    Init {
        /// Overwrite an existing ledger state
        #[arg(long)]
        force: bool,
    },

    /// Show token, fee and reserve status
    Status,

    /// Show an account's balances
    Balance {
        /// Account address (0x-prefixed hex)
        address: String,
    },

    /// Transfer tokens
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Amount in tokens (e.g. 1.5)
        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        amount: Option<String>,
        /// Send the sender's whole reported balance
        #[arg(long)]
        all: bool,
    },

    /// Allow a spender to move an owner's tokens
    Approve {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        spender: String,
        #[arg(long)]
        amount: String,
    },

    /// Transfer tokens using an allowance
    TransferFrom {
        #[arg(long)]
        spender: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        amount: Option<String>,
        /// Move `from`'s whole reported balance
        #[arg(long)]
        all: bool,
    },

    /// Buy tokens from the simulated pool
    Buy {
        #[arg(long)]
        to: String,
        /// Base asset paid in
        #[arg(long)]
        base_in: String,
    },

    /// Sell tokens into the simulated pool
    Sell {
        #[arg(long)]
        from: String,
        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        amount: Option<String>,
        /// Sell the whole reported balance
        #[arg(long)]
        all: bool,
    },

    /// Burn tokens for a reward from the burn-to-earn reserve
    Burn {
        #[arg(long)]
        from: String,
        #[arg(long)]
        amount: String,
    },

    /// Deposit base asset into the burn-to-earn reserve
    FundReserve {
        #[arg(long)]
        amount: String,
    },

    /// Owner administration
    Admin {
        /// Act as this caller instead of the configured owner
        #[arg(long = "as")]
        caller: Option<String>,

        #[command(subcommand)]
        command: AdminCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing(cli.verbose)?;

    let config_path = match cli.config {
        Some(path) => PathBuf::from(path),
        None => config::default_config_path()?,
    };
    let state_path = cli
        .state
        .map(PathBuf::from)
        .unwrap_or_else(|| config::state_path_from_config(&config_path));
    let (config_path, state_path) = (config_path.as_path(), state_path.as_path());

    match cli.command {
        Commands::Init { force } => commands::init::run(config_path, state_path, force),
        Commands::Status => commands::status::run(config_path, state_path),
        Commands::Balance { address } => commands::balance::run(config_path, state_path, &address),
        Commands::Transfer { from, to, amount, .. } => {
            commands::transfer::run(config_path, state_path, &from, &to, amount.as_deref())
        }
        Commands::Approve {
            owner,
            spender,
            amount,
        } => commands::approve::run(config_path, state_path, &owner, &spender, &amount),
        Commands::TransferFrom {
            spender,
            from,
            to,
            amount,
            ..
        } => commands::transfer::run_from(
            config_path,
            state_path,
            &spender,
            &from,
            &to,
            amount.as_deref(),
        ),
        Commands::Buy { to, base_in } => {
            commands::buy::run(config_path, state_path, &to, &base_in)
        }
        Commands::Sell { from, amount, .. } => {
            commands::sell::run(config_path, state_path, &from, amount.as_deref())
        }
        Commands::Burn { from, amount } => {
            commands::burn::run(config_path, state_path, &from, &amount)
        }
        Commands::FundReserve { amount } => {
            commands::fund_reserve::run(config_path, state_path, &amount)
        }
        Commands::Admin { caller, command } => {
            commands::admin::run(config_path, state_path, caller.as_deref(), command)
        }
    }
}
