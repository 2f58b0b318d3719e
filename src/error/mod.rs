//! Error handling for the vault client
//!
//! One error type covers wallet negotiation, transaction submission,
//! validation and configuration. Store and bus operations never fail.

use std::fmt;

/// Result type alias for vault client operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Provider error code for a request the user declined in the wallet
pub const USER_REJECTED_CODE: i64 = 4001;

/// Provider error code for a chain the wallet does not know yet
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Severity used when an error is surfaced to the user as an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Error types for vault client operations
#[derive(Debug, Clone, PartialEq)]
pub enum VaultError {
    /// No injected wallet provider is available
    WalletNotFound,
    /// The user declined a wallet request
    UserRejected,
    /// The wallet returned no accounts
    NoAccounts,
    /// The target chain could not be added to the wallet
    NetworkAddFailed,
    /// Raw error reported by the wallet provider
    Provider { code: i64, message: String },
    /// Other wallet errors
    Wallet(String),
    /// RPC or chain communication errors
    Network(String),
    /// Transaction submission or execution errors
    Transaction(String),
    /// Input validation errors
    Validation(String),
    /// Amount exceeds what the account holds
    InsufficientFunds { required: String, available: String },
    /// Gas estimation errors
    Gas(String),
    /// Configuration errors
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Invalid address format
    InvalidAddress(String),
}

impl VaultError {
    /// Whether this error came from the user declining a wallet prompt
    pub fn is_user_rejection(&self) -> bool {
        match self {
            VaultError::UserRejected => true,
            VaultError::Provider { code, .. } => *code == USER_REJECTED_CODE,
            _ => false,
        }
    }

    /// Message and severity shown to the user for a failed wallet connection
    pub fn user_message(&self) -> (&'static str, Severity) {
        match self {
            VaultError::WalletNotFound => (
                "Please install MetaMask to use this application",
                Severity::Error,
            ),
            VaultError::UserRejected => ("Connection request was rejected", Severity::Warning),
            VaultError::NoAccounts => (
                "No accounts found. Please check your wallet",
                Severity::Error,
            ),
            VaultError::NetworkAddFailed => (
                "Failed to add Base network. Please try manually",
                Severity::Error,
            ),
            _ => ("Failed to connect wallet", Severity::Error),
        }
    }
}

impl fmt::Display for VaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultError::WalletNotFound => write!(f, "Wallet provider not found"),
            VaultError::UserRejected => write!(f, "Request rejected by user"),
            VaultError::NoAccounts => write!(f, "No accounts available"),
            VaultError::NetworkAddFailed => write!(f, "Failed to add network to wallet"),
            VaultError::Provider { code, message } => {
                write!(f, "Provider error {code}: {message}")
            }
            VaultError::Wallet(msg) => write!(f, "Wallet error: {msg}"),
            VaultError::Network(msg) => write!(f, "Network error: {msg}"),
            VaultError::Transaction(msg) => write!(f, "Transaction error: {msg}"),
            VaultError::Validation(msg) => write!(f, "{msg}"),
            VaultError::InsufficientFunds {
                required,
                available,
            } => {
                write!(
                    f,
                    "Insufficient balance: required {required}, available {available}"
                )
            }
            VaultError::Gas(msg) => write!(f, "Gas error: {msg}"),
            VaultError::Config(msg) => write!(f, "Configuration error: {msg}"),
            VaultError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            VaultError::Io(msg) => write!(f, "I/O error: {msg}"),
            VaultError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
        }
    }
}

impl std::error::Error for VaultError {}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for VaultError {
    fn from(err: toml::de::Error) -> Self {
        VaultError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VaultError {
    fn from(err: toml::ser::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejection_detection() {
        assert!(VaultError::UserRejected.is_user_rejection());
        assert!(VaultError::Provider {
            code: USER_REJECTED_CODE,
            message: "denied".to_string(),
        }
        .is_user_rejection());
        assert!(!VaultError::Network("timeout".to_string()).is_user_rejection());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            VaultError::UserRejected.user_message(),
            ("Connection request was rejected", Severity::Warning)
        );
        assert_eq!(
            VaultError::Network("boom".to_string()).user_message().0,
            "Failed to connect wallet"
        );
    }

    #[test]
    fn test_display() {
        let err = VaultError::InsufficientFunds {
            required: "10".to_string(),
            available: "5".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: required 10, available 5"
        );
        assert_eq!(
            VaultError::Validation("Amount is required".to_string()).to_string(),
            "Amount is required"
        );
    }
}
