use crate::config::ChainConfig;
use crate::error::Result;

/// Injected wallet provider (browser extension, hardware bridge, test double)
///
/// Errors raised by the wallet itself are reported as
/// [`VaultError::Provider`](crate::error::VaultError::Provider) carrying the
/// provider's numeric code, so callers can tell a user rejection (4001) or an
/// unknown chain (4902) from other failures.
pub trait WalletProvider: Send + Sync {
    /// Whether a wallet is present at all
    fn is_available(&self) -> bool;

    /// Ask the user to expose their accounts
    fn request_accounts(&self) -> Result<Vec<String>>;

    /// Currently selected chain as a hex string
    fn chain_id(&self) -> Result<String>;

    fn switch_chain(&self, chain_id: &str) -> Result<()>;

    fn add_chain(&self, chain: &ChainConfig) -> Result<()>;
}
