//! Wallet session management
//!
//! Connects to an injected wallet provider, keeps it on the configured chain
//! and mirrors the session into the store.

pub mod connector;
pub mod events;
pub mod provider;

pub use connector::{ConnectionState, WalletConnector};
pub use events::{ProviderEvent, WalletEvents};
pub use provider::WalletProvider;
