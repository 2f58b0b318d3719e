//! Configuration management
//!
//! Chain parameters, contract addresses, retry policy, gas thresholds and
//! alert limits. Loaded from defaults, an optional TOML file and the
//! environment.

pub mod settings;

pub use settings::{
    AlertSettings, ChainConfig, ContractAddresses, FallbackGasLimits, GasSettings,
    NativeCurrency, Settings, TransactionSettings,
};
