//! Tracing setup for the operator CLI.
//!
//! Log output goes to stderr so command output on stdout stays scriptable.
//! `RUST_LOG` overrides the level chosen by `--verbose`:
//!
//! ```text
//! RUST_LOG=brb_ledger_core=debug brb transfer ...
//! ```

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Build the filter: `RUST_LOG` when set and valid, otherwise the default.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Initialize the global tracing subscriber.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    #[serial]
    fn test_rust_log_overrides_verbosity() {
        let saved = std::env::var_os("RUST_LOG");
        std::env::set_var("RUST_LOG", "warn");
        assert_eq!(env_filter(true).to_string(), "warn");

        std::env::remove_var("RUST_LOG");
        assert_eq!(env_filter(true).to_string(), "debug");

        if let Some(value) = saved {
            std::env::set_var("RUST_LOG", value);
        }
    }
}
