use anyhow::{ensure, Context, Result};
use brb_ledger_core::{
    Address, BurnToEarnConfig, FeeConfig, FeeReceivers, FeeSchedule, FeeShares, FeesEnabled,
    LimitConfig, SwapBackConfig, TokenConfig, BPS_DENOMINATOR, DEFAULT_GRACE_PERIOD_SECS, UNIT,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the persisted ledger state, next to the config.
pub const STATE_FILE_NAME: &str = "ledger.brb";

/// Operator configuration for `brb`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub token: TokenSection,
    #[serde(default)]
    pub fees: FeesSection,
    #[serde(default)]
    pub limits: LimitsSection,
    #[serde(default)]
    pub swap_back: SwapBackSection,
    #[serde(default)]
    pub burn_to_earn: BurnToEarnSection,
    #[serde(default)]
    pub pool: PoolSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSection {
    /// Owner account; receives the genesis supply
    #[serde(default = "default_owner")]
    pub owner: String,

    /// The token's own account (tax collection and base-asset book)
    #[serde(default = "default_contract")]
    pub contract: String,

    /// Liquidity pair of the simulated pool
    #[serde(default = "default_pair")]
    pub pair: String,

    /// Total supply in whole tokens
    #[serde(default = "default_supply")]
    pub supply: u64,

    /// Seconds after activation during which grace-exempt accounts trade free
    #[serde(default = "default_grace_period_secs")]
    pub grace_period_secs: u64,
}

fn default_owner() -> String {
    Address::from_low_u64(0x01).to_string()
}

fn default_contract() -> String {
    Address::from_low_u64(0xc0).to_string()
}

fn default_pair() -> String {
    Address::from_low_u64(0x9a).to_string()
}

fn default_supply() -> u64 {
    1_000_000_000
}

fn default_grace_period_secs() -> u64 {
    DEFAULT_GRACE_PERIOD_SECS
}

impl Default for TokenSection {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            contract: default_contract(),
            pair: default_pair(),
            supply: default_supply(),
            grace_period_secs: default_grace_period_secs(),
        }
    }
}

/// Fee shares in basis points, ordered `[marketing, liquidity, buyback, treasury]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeesSection {
    #[serde(default = "default_shares")]
    pub buy: [u32; 4],
    #[serde(default = "default_shares")]
    pub sell: [u32; 4],

    /// Receivers of swap-back proceeds in the same order; empty means the owner
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub receivers: Vec<String>,
}

fn default_shares() -> [u32; 4] {
    FeeSchedule::default().shares.as_array()
}

impl Default for FeesSection {
    fn default() -> Self {
        Self {
            buy: default_shares(),
            sell: default_shares(),
            receivers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Per-transaction cap, in basis points of supply
    #[serde(default = "default_max_tx_bps")]
    pub max_tx_bps: u32,

    /// Per-wallet cap, in basis points of supply
    #[serde(default = "default_max_wallet_bps")]
    pub max_wallet_bps: u32,
}

fn default_true() -> bool {
    true
}

fn default_max_tx_bps() -> u32 {
    100
}

fn default_max_wallet_bps() -> u32 {
    200
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            max_tx_bps: default_max_tx_bps(),
            max_wallet_bps: default_max_wallet_bps(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapBackSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Tax balance that triggers a swap-back, in basis points of supply
    #[serde(default = "default_threshold_bps")]
    pub threshold_bps: u32,

    /// Share of proceeds kept for burn-to-earn
    #[serde(default = "default_burn_reserve_bps")]
    pub burn_reserve_bps: u32,
}

fn default_threshold_bps() -> u32 {
    5
}

fn default_burn_reserve_bps() -> u32 {
    2_000
}

impl Default for SwapBackSection {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_bps: default_threshold_bps(),
            burn_reserve_bps: default_burn_reserve_bps(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnToEarnSection {
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_burn_cap_bps")]
    pub burn_cap_bps: u32,
    #[serde(default = "default_reward_multiplier_bps")]
    pub reward_multiplier_bps: u32,
}

fn default_cooldown_secs() -> u64 {
    BurnToEarnConfig::default().cooldown_secs
}

fn default_burn_cap_bps() -> u32 {
    BurnToEarnConfig::default().burn_cap_bps
}

fn default_reward_multiplier_bps() -> u32 {
    BurnToEarnConfig::default().reward_multiplier_bps
}

impl Default for BurnToEarnSection {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            burn_cap_bps: default_burn_cap_bps(),
            reward_multiplier_bps: default_reward_multiplier_bps(),
        }
    }
}

/// Initial liquidity of the simulated constant-product pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSection {
    /// Share of supply the owner seeds into the pool, in basis points
    #[serde(default = "default_token_liquidity_bps")]
    pub token_liquidity_bps: u32,

    /// Base asset in the pool, in whole units
    #[serde(default = "default_base_liquidity")]
    pub base_liquidity: u64,

    /// Pool swap fee in basis points
    #[serde(default = "default_pool_fee_bps")]
    pub fee_bps: u32,
}

fn default_token_liquidity_bps() -> u32 {
    7_500
}

fn default_base_liquidity() -> u64 {
    1_000
}

fn default_pool_fee_bps() -> u32 {
    30
}

impl Default for PoolSection {
    fn default() -> Self {
        Self {
            token_liquidity_bps: default_token_liquidity_bps(),
            base_liquidity: default_base_liquidity(),
            fee_bps: default_pool_fee_bps(),
        }
    }
}

/// Accounts named in the config, parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accounts {
    pub owner: Address,
    pub contract: Address,
    pub pair: Address,
}

impl Config {
    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Check if config file exists
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn accounts(&self) -> Result<Accounts> {
        Ok(Accounts {
            owner: parse_address(&self.token.owner, "token.owner")?,
            contract: parse_address(&self.token.contract, "token.contract")?,
            pair: parse_address(&self.token.pair, "token.pair")?,
        })
    }

    /// Total supply in base units.
    pub fn supply_units(&self) -> Result<u128> {
        (self.token.supply as u128)
            .checked_mul(UNIT)
            .context("token.supply out of range")
    }

    /// Build the ledger's creation parameters.
    pub fn token_config(&self) -> Result<TokenConfig> {
        let total_supply = self.supply_units()?;
        let receivers = self.fee_receivers()?;
        let of_supply = |bps: u32| total_supply / BPS_DENOMINATOR * bps as u128;

        Ok(TokenConfig {
            total_supply,
            fees: FeeConfig {
                buy: FeeSchedule::new(shares(self.fees.buy)),
                sell: FeeSchedule::new(shares(self.fees.sell)),
            },
            limits: LimitConfig {
                enabled: self.limits.enabled,
                max_tx: of_supply(self.limits.max_tx_bps),
                max_wallet: of_supply(self.limits.max_wallet_bps),
            },
            swap_back: SwapBackConfig {
                fees_enabled: if self.swap_back.enabled {
                    FeesEnabled::Enabled
                } else {
                    FeesEnabled::Disabled
                },
                swap_threshold: of_supply(self.swap_back.threshold_bps),
                burn_reserve_bps: self.swap_back.burn_reserve_bps,
            },
            receivers,
            burn_to_earn: BurnToEarnConfig {
                cooldown_secs: self.burn_to_earn.cooldown_secs,
                burn_cap_bps: self.burn_to_earn.burn_cap_bps,
                reward_multiplier_bps: self.burn_to_earn.reward_multiplier_bps,
            },
            grace_period_secs: self.token.grace_period_secs,
        })
    }

    fn fee_receivers(&self) -> Result<Option<FeeReceivers>> {
        if self.fees.receivers.is_empty() {
            return Ok(None);
        }
        ensure!(
            self.fees.receivers.len() == 4,
            "fees.receivers must list 4 addresses (marketing, liquidity, buyback, treasury), got {}",
            self.fees.receivers.len()
        );
        let parsed = self
            .fees
            .receivers
            .iter()
            .map(|s| parse_address(s, "fees.receivers"))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(FeeReceivers {
            marketing: parsed[0],
            liquidity: parsed[1],
            buyback: parsed[2],
            treasury: parsed[3],
        }))
    }
}

pub fn shares([marketing, liquidity, buyback, treasury]: [u32; 4]) -> FeeShares {
    FeeShares::new(marketing, liquidity, buyback, treasury)
}

fn parse_address(value: &str, field: &str) -> Result<Address> {
    value
        .parse()
        .with_context(|| format!("Invalid address in {field}: {value:?}"))
}

/// Get the default data directory (`~/.brb`)
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".brb"))
        .context("Could not determine home directory")
}

/// Get the default config file path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(default_data_dir()?.join("config.toml"))
}

/// Get the state file path from config file path
pub fn state_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or(config_path)
        .join(STATE_FILE_NAME)
}
