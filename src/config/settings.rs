use crate::error::{Result, VaultError};
use crate::utils::validators::validate_address;
use log::info;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const CHAIN_ID_KEY: &str = "VAULT_CHAIN_ID";
const RPC_URL_KEY: &str = "VAULT_RPC_URL";
const CONTRACT_ADDRESS_KEY: &str = "VAULT_CONTRACT_ADDRESS";
const USDC_ADDRESS_KEY: &str = "VAULT_USDC_ADDRESS";

/// Base mainnet
static DEFAULT_CHAIN_ID: &str = "0x2105";
static DEFAULT_RPC_URL: &str = "https://mainnet.base.org";
static DEFAULT_USDC_ADDRESS: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";

/// Effective client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chain: ChainConfig,
    pub contracts: ContractAddresses,
    pub transactions: TransactionSettings,
    pub gas: GasSettings,
    pub alerts: AlertSettings,
}

/// Parameters passed to the wallet when the chain has to be added
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
    pub native_currency: NativeCurrency,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            chain_name: "Base".to_string(),
            rpc_urls: vec![DEFAULT_RPC_URL.to_string()],
            block_explorer_urls: vec!["https://basescan.org".to_string()],
            native_currency: NativeCurrency::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self {
            name: "Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractAddresses {
    /// Yield vault contract; empty until configured
    pub vault: String,
    pub usdc: String,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            vault: String::new(),
            usdc: DEFAULT_USDC_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionSettings {
    /// Send attempts per transaction, including the first
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub confirmation_blocks: u64,
}

impl Default for TransactionSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 1000,
            confirmation_blocks: 1,
        }
    }
}

/// Gas thresholds and fallbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasSettings {
    /// Above this the user is warned
    pub high_price_gwei: u64,
    /// Above this the transaction is refused
    pub extreme_price_gwei: u64,
    pub price_buffer_percent: u32,
    pub limit_buffer_percent: u32,
    pub network_max_gas_limit: u64,
    pub fallback_price_gwei: u64,
    /// Range a submitted gas price must fall in
    pub min_price_gwei: f64,
    pub max_price_gwei: f64,
    /// Total cost in ETH above which a transaction is flagged as expensive
    pub high_cost_threshold_eth: String,
    pub fallback_limits: FallbackGasLimits,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            high_price_gwei: 30,
            extreme_price_gwei: 100,
            price_buffer_percent: 110,
            limit_buffer_percent: 120,
            network_max_gas_limit: 30_000_000,
            fallback_price_gwei: 1,
            min_price_gwei: 0.001,
            max_price_gwei: 500.0,
            high_cost_threshold_eth: "0.001".to_string(),
            fallback_limits: FallbackGasLimits::default(),
        }
    }
}

/// Gas limits used when the node cannot estimate a call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackGasLimits {
    pub approval: u64,
    pub deposit: u64,
    pub withdraw: u64,
    pub claim: u64,
}

impl Default for FallbackGasLimits {
    fn default() -> Self {
        Self {
            approval: 60_000,
            deposit: 200_000,
            withdraw: 150_000,
            claim: 120_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub duration_ms: u64,
    pub max_alerts: usize,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            duration_ms: 5000,
            max_alerts: 3,
        }
    }
}

impl Settings {
    /// Defaults, then the optional TOML file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Settings::default(),
        };
        settings.apply_overrides(|key| env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Settings> {
        let raw = fs::read_to_string(path)?;
        let settings = toml::from_str(&raw)?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(chain_id) = lookup(CHAIN_ID_KEY) {
            self.chain.chain_id = chain_id;
        }
        if let Some(rpc_url) = lookup(RPC_URL_KEY) {
            self.chain.rpc_urls = vec![rpc_url];
        }
        if let Some(vault) = lookup(CONTRACT_ADDRESS_KEY) {
            self.contracts.vault = vault;
        }
        if let Some(usdc) = lookup(USDC_ADDRESS_KEY) {
            self.contracts.usdc = usdc;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.chain.chain_id.starts_with("0x") || self.chain.chain_id.len() < 3 {
            return Err(VaultError::Config(format!(
                "Chain id must be a 0x-prefixed hex string, got {}",
                self.chain.chain_id
            )));
        }

        if !self.contracts.vault.is_empty() && !validate_address(&self.contracts.vault) {
            return Err(VaultError::InvalidAddress(self.contracts.vault.clone()));
        }

        if !validate_address(&self.contracts.usdc) {
            return Err(VaultError::InvalidAddress(self.contracts.usdc.clone()));
        }

        if self.transactions.max_retries == 0 {
            return Err(VaultError::Config(
                "max_retries must allow at least one attempt".to_string(),
            ));
        }

        if self.gas.high_price_gwei > self.gas.extreme_price_gwei {
            return Err(VaultError::Config(
                "High gas threshold cannot exceed the extreme threshold".to_string(),
            ));
        }

        if self.gas.price_buffer_percent < 100 || self.gas.limit_buffer_percent < 100 {
            return Err(VaultError::Config(
                "Gas buffers cannot be below 100 percent".to_string(),
            ));
        }

        if self.gas.min_price_gwei > self.gas.max_price_gwei {
            return Err(VaultError::Config(
                "Minimum gas price cannot exceed the maximum".to_string(),
            ));
        }

        if self.alerts.max_alerts == 0 {
            return Err(VaultError::Config(
                "max_alerts cannot be zero".to_string(),
            ));
        }

        Ok(())
    }

    /// The vault address, or an error if it was never configured
    pub fn vault_address(&self) -> Result<&str> {
        if self.contracts.vault.is_empty() {
            return Err(VaultError::Config(
                "Vault contract address is not configured".to_string(),
            ));
        }
        Ok(&self.contracts.vault)
    }
}
