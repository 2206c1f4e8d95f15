//! Configuration management for the bootstrap run
//!
//! Loads an optional TOML file with environment variable substitution, then lets
//! the classic environment variables (`PRIVATE_KEY`, `L1_CHAIN_RPC`, ...) override it.

use crate::amount;
use crate::error::{BootstrapError, BootstrapResult};

use anyhow::{Context, Result};
use ethers::types::U256;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_PATH_ENV: &str = "BRIDGE_BOOTSTRAP_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/bootstrap.toml";

pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";
pub const PARENT_RPC_ENV: &str = "L1_CHAIN_RPC";
pub const CHILD_RPC_ENV: &str = "L2_CHAIN_RPC";
pub const TOKEN_SUPPLY_ENV: &str = "TOKEN_SUPPLY_AMOUNT";
pub const BRIDGE_AMOUNT_ENV: &str = "TOKEN_BRIDGE_AMOUNT";

lazy_static! {
    static ref ENV_PLACEHOLDER: Regex = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub wallet: WalletConfig,
    pub parent: ChainConfig,
    pub child: ChainConfig,
    pub token: TokenConfig,
    pub bootstrap: BootstrapConfig,
    pub gas: GasConfig,
    pub networks: Vec<CustomNetworkConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub private_key: Option<SecretString>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub rpc_url: Option<String>,
    /// Blocks to wait per transaction; defaults per chain when unset
    pub confirmations: Option<usize>,
    pub poll_interval_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            confirmations: None,
            poll_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Whole tokens minted to the deployer; the parent token uses 0 decimals for supply.
    pub initial_supply: Option<String>,
    /// Human-readable amount, scaled by the deployed token's `decimals()`.
    pub bridge_amount: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub artifacts_dir: PathBuf,
    pub message_poll_interval_ms: u64,
    /// Unset means wait for cross-chain messages indefinitely
    pub message_timeout_secs: Option<u64>,
    pub write_record: bool,
    pub record_path: PathBuf,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("artifacts"),
            message_poll_interval_ms: 5000,
            message_timeout_secs: None,
            write_record: true,
            record_path: PathBuf::from("deployments/bootstrap.json"),
        }
    }
}

impl BootstrapConfig {
    /// Where the deployment record goes, if it is written at all
    pub fn record_target(&self) -> Option<&Path> {
        self.write_record.then_some(self.record_path.as_path())
    }

    pub fn message_poll_interval(&self) -> Duration {
        Duration::from_millis(self.message_poll_interval_ms)
    }

    pub fn message_timeout(&self) -> Option<Duration> {
        self.message_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub retryable_gas_limit: u64,
    pub gas_price_buffer_percent: u64,
    pub submission_fee_buffer_percent: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            retryable_gas_limit: 300_000,
            gas_price_buffer_percent: 500,
            submission_fee_buffer_percent: 300,
        }
    }
}

/// Child network descriptor for chains missing from the built-in registry
#[derive(Debug, Clone, Deserialize)]
pub struct CustomNetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub parent_chain_id: u64,
    pub inbox: String,
    pub parent_gateway_router: Option<String>,
    pub child_gateway_router: Option<String>,
}

/// String that never shows up in `Debug` output
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

impl Settings {
    /// Load settings from the configuration file and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH), |name| env::var(name).ok())
    }

    /// Load with an explicit default path and variable lookup
    pub fn load_from<F>(default_path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match read_config_file(default_path, &lookup)? {
            Some(config_str) => Self::from_toml(&config_str)?,
            None => Settings::default(),
        };

        settings.apply_env_overrides(&lookup);
        settings.validate()?;

        Ok(settings)
    }

    /// Parse settings from TOML text, substituting `${VAR}` placeholders first
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config_str = substitute_env_vars(config_str);
        toml::from_str(&config_str).with_context(|| "Failed to parse configuration")
    }

    /// Environment variables win over file values; blank values are ignored
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(PRIVATE_KEY_ENV) {
            self.wallet.private_key = Some(SecretString::new(key));
        }
        if let Some(url) = lookup(PARENT_RPC_ENV) {
            self.parent.rpc_url = Some(url);
        }
        if let Some(url) = lookup(CHILD_RPC_ENV) {
            self.child.rpc_url = Some(url);
        }
        if let Some(supply) = lookup(TOKEN_SUPPLY_ENV) {
            self.token.initial_supply = Some(supply);
        }
        if let Some(amount) = lookup(BRIDGE_AMOUNT_ENV) {
            self.token.bridge_amount = Some(amount);
        }
    }

    /// Validate the optional knobs; required inputs are checked by `BootstrapParams`
    fn validate(&self) -> Result<()> {
        if self.parent.confirmations == Some(0) || self.child.confirmations == Some(0) {
            anyhow::bail!("Confirmation counts must be at least 1");
        }
        if self.bootstrap.message_poll_interval_ms == 0 {
            anyhow::bail!("message_poll_interval_ms must be positive");
        }
        if self.gas.retryable_gas_limit == 0 {
            anyhow::bail!("retryable_gas_limit must be positive");
        }
        for network in &self.networks {
            if network.parent_gateway_router.is_none() || network.child_gateway_router.is_none() {
                tracing::warn!(
                    "Network {} ({}) has no token bridge routers configured",
                    network.name,
                    network.chain_id
                );
            }
        }
        Ok(())
    }
}

/// The five required inputs, checked before anything touches the network
#[derive(Debug, Clone)]
pub struct BootstrapParams {
    pub private_key: SecretString,
    pub parent_rpc_url: String,
    pub child_rpc_url: String,
    pub initial_supply: U256,
    pub bridge_amount: String,
}

impl BootstrapParams {
    pub fn from_settings(settings: &Settings) -> BootstrapResult<Self> {
        let private_key = settings
            .wallet
            .private_key
            .clone()
            .filter(|k| !k.expose().trim().is_empty())
            .ok_or(BootstrapError::MissingParameter(PRIVATE_KEY_ENV))?;
        let parent_rpc_url = required(&settings.parent.rpc_url, PARENT_RPC_ENV)?;
        let child_rpc_url = required(&settings.child.rpc_url, CHILD_RPC_ENV)?;
        let supply = required(&settings.token.initial_supply, TOKEN_SUPPLY_ENV)?;
        let bridge_amount = required(&settings.token.bridge_amount, BRIDGE_AMOUNT_ENV)?;

        let initial_supply = amount::parse_supply(&supply).map_err(|reason| {
            BootstrapError::InvalidParameter {
                name: TOKEN_SUPPLY_ENV,
                reason,
            }
        })?;
        amount::validate_decimal(&bridge_amount).map_err(|reason| {
            BootstrapError::InvalidParameter {
                name: BRIDGE_AMOUNT_ENV,
                reason,
            }
        })?;

        Ok(Self {
            private_key,
            parent_rpc_url,
            child_rpc_url,
            initial_supply,
            bridge_amount,
        })
    }
}

fn required(value: &Option<String>, name: &'static str) -> BootstrapResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(BootstrapError::MissingParameter(name))
}

/// Config file text, if any. A missing default file is fine; a missing file named
/// by `BRIDGE_BOOTSTRAP_CONFIG` is not.
fn read_config_file<F>(default_path: &Path, lookup: &F) -> Result<Option<String>>
where
    F: Fn(&str) -> Option<String>,
{
    let (config_path, explicit) = match lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
        Some(path) => (PathBuf::from(path), true),
        None => (default_path.to_path_buf(), false),
    };

    if !explicit && !config_path.exists() {
        return Ok(None);
    }

    std::fs::read_to_string(&config_path)
        .map(Some)
        .with_context(|| format!("Failed to read config file: {:?}", config_path))
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    let mut result = input.to_string();

    for cap in ENV_PLACEHOLDER.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}
