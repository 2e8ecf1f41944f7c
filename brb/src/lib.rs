//! BRB operator library.
//!
//! Configuration, the persisted ledger state and the command
//! implementations behind the `brb` binary. The token logic itself lives in
//! `brb-ledger-core`.

#![deny(clippy::print_stdout)]

pub mod amount;
pub mod config;
pub mod state;
pub mod telemetry;

// Re-export commands module for CLI binary
pub mod commands;
