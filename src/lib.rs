//! # Yield Vault - client core for a USDC yield vault on Base
//!
//! Everything a front end needs to talk to the vault, without the front end.
//!
//! ## What's Here
//! - **Event Bus**: typed publish/subscribe with `once` listeners and
//!   per-listener failure isolation
//! - **State Store**: one application state tree, partial updates, change
//!   notifications for the watched paths and a bounded transaction history
//! - **Wallet**: connection negotiation, network switching and provider
//!   notifications behind the [`WalletProvider`] trait
//! - **Transactions**: gas estimation, submit-and-confirm with retries and
//!   the vault actions behind the [`VaultContract`] trait
//! - **Alerts**: a bounded queue of user notifications published on the bus
//!
//! ## Layout
//! - `core/`: bus, store, state and event schemas, token amount helpers
//! - `wallet/`: provider seam, connector, provider event handling
//! - `transactions/`: contract seam, gas, executor, vault actions
//! - `notify/`: alerts
//! - `config/`: settings file and environment overrides
//! - `utils/`: validators, formatters, clock
//! - `cli/`: the `yield-vault` command line
//!
//! There are no globals. Build an [`AppContext`] and hand clones of it to
//! each component; every context is an isolated bus, store and alert queue.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod notify;
pub mod transactions;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

pub use cli::{Command, Opt};
pub use config::Settings;
pub use crate::core::{
    AlertLevel, AppContext, AppState, Event, EventBus, EventKind, ListenerResult, StateUpdate,
    Store, Subscription, TransactionInfo, TransactionKind, TransactionStatus,
};
pub use error::{Result, VaultError};
pub use notify::{Alert, AlertCenter};
pub use transactions::{
    ContractCall, GasEstimator, TransactionExecutor, TransactionReceipt, TransactionRequest,
    VaultActions, VaultContract,
};
pub use wallet::{ConnectionState, ProviderEvent, WalletConnector, WalletEvents, WalletProvider};
