use crate::core::state::{AppState, TransactionInfo, TransactionKind};
use crate::error::VaultError;
use serde::{Deserialize, Serialize};

/// Every kind of notification the bus can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    WalletConnected,
    WalletDisconnected,
    WalletAccountChanged,
    WalletError,
    NetworkChanged,
    NetworkAdded,
    TransactionStarted,
    TransactionSuccess,
    TransactionError,
    TransactionConfirmed,
    TransactionUpdated,
    StateUpdated,
    BalanceUpdated,
    RewardsUpdated,
    AlertShown,
    AlertRemoved,
}

impl EventKind {
    pub const ALL: [EventKind; 16] = [
        EventKind::WalletConnected,
        EventKind::WalletDisconnected,
        EventKind::WalletAccountChanged,
        EventKind::WalletError,
        EventKind::NetworkChanged,
        EventKind::NetworkAdded,
        EventKind::TransactionStarted,
        EventKind::TransactionSuccess,
        EventKind::TransactionError,
        EventKind::TransactionConfirmed,
        EventKind::TransactionUpdated,
        EventKind::StateUpdated,
        EventKind::BalanceUpdated,
        EventKind::RewardsUpdated,
        EventKind::AlertShown,
        EventKind::AlertRemoved,
    ];

    /// Wire name, e.g. `wallet:connected`
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::WalletConnected => "wallet:connected",
            EventKind::WalletDisconnected => "wallet:disconnected",
            EventKind::WalletAccountChanged => "wallet:accountChanged",
            EventKind::WalletError => "wallet:error",
            EventKind::NetworkChanged => "network:changed",
            EventKind::NetworkAdded => "network:added",
            EventKind::TransactionStarted => "transaction:started",
            EventKind::TransactionSuccess => "transaction:success",
            EventKind::TransactionError => "transaction:error",
            EventKind::TransactionConfirmed => "transaction:confirmed",
            EventKind::TransactionUpdated => "transaction:updated",
            EventKind::StateUpdated => "state:updated",
            EventKind::BalanceUpdated => "balance:updated",
            EventKind::RewardsUpdated => "rewards:updated",
            EventKind::AlertShown => "alert:shown",
            EventKind::AlertRemoved => "alert:removed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| VaultError::Config(format!("Unknown event type: {s}")))
    }
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Success => write!(f, "success"),
            AlertLevel::Error => write!(f, "error"),
            AlertLevel::Warning => write!(f, "warning"),
            AlertLevel::Info => write!(f, "info"),
        }
    }
}

/// Payload of `balance:updated` and `rewards:updated`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    /// Sub-key inside the namespace, e.g. `usdc`
    #[serde(rename = "type")]
    pub field: String,
    pub value: String,
}

/// A notification together with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    WalletConnected {
        account: Option<String>,
        chain_id: Option<String>,
    },
    WalletDisconnected {
        reason: Option<String>,
    },
    WalletAccountChanged {
        account: String,
    },
    WalletError {
        error: String,
    },
    NetworkChanged {
        chain_id: String,
        is_supported: bool,
    },
    NetworkAdded {
        chain_id: String,
        chain_name: String,
    },
    TransactionStarted {
        kind: TransactionKind,
    },
    TransactionSuccess {
        kind: TransactionKind,
        hash: String,
    },
    TransactionError {
        kind: TransactionKind,
        error: String,
    },
    TransactionConfirmed {
        hash: String,
        block_number: Option<u64>,
    },
    TransactionUpdated {
        hash: String,
        info: TransactionInfo,
    },
    StateUpdated {
        changes: Vec<String>,
        state: Box<AppState>,
    },
    BalanceUpdated(FieldUpdate),
    RewardsUpdated(FieldUpdate),
    AlertShown {
        id: String,
        message: String,
        level: AlertLevel,
    },
    AlertRemoved {
        id: String,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::WalletConnected { .. } => EventKind::WalletConnected,
            Event::WalletDisconnected { .. } => EventKind::WalletDisconnected,
            Event::WalletAccountChanged { .. } => EventKind::WalletAccountChanged,
            Event::WalletError { .. } => EventKind::WalletError,
            Event::NetworkChanged { .. } => EventKind::NetworkChanged,
            Event::NetworkAdded { .. } => EventKind::NetworkAdded,
            Event::TransactionStarted { .. } => EventKind::TransactionStarted,
            Event::TransactionSuccess { .. } => EventKind::TransactionSuccess,
            Event::TransactionError { .. } => EventKind::TransactionError,
            Event::TransactionConfirmed { .. } => EventKind::TransactionConfirmed,
            Event::TransactionUpdated { .. } => EventKind::TransactionUpdated,
            Event::StateUpdated { .. } => EventKind::StateUpdated,
            Event::BalanceUpdated(_) => EventKind::BalanceUpdated,
            Event::RewardsUpdated(_) => EventKind::RewardsUpdated,
            Event::AlertShown { .. } => EventKind::AlertShown,
            Event::AlertRemoved { .. } => EventKind::AlertRemoved,
        }
    }
}
