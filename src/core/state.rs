//! Application state schema
//!
//! The tree has a fixed shape: one struct per namespace. Partial updates are
//! expressed with `*Update` structs whose `None` fields leave the current
//! value alone; [`AppState::apply`] merges them field by field and reports
//! which watched paths actually changed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, VecDeque};

/// Maximum number of resolved transactions kept in history
pub const HISTORY_LIMIT: usize = 50;

/// Paths whose change is broadcast
pub const WATCHED_PATHS: [&str; 5] = [
    "wallet.address",
    "balance.usdc",
    "balance.deposits",
    "rewards.pending",
    "rank.current",
];

pub fn is_watched(path: &str) -> bool {
    WATCHED_PATHS.contains(&path)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub wallet: WalletState,
    pub balance: BalanceState,
    pub rewards: RewardsState,
    pub rank: RankState,
    pub transactions: TransactionsState,
    pub loading: LoadingState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletState {
    pub address: String,
    pub is_connected: bool,
    pub network_id: Option<String>,
}

/// Token balances as decimal strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceState {
    pub usdc: String,
    pub deposits: String,
    pub rewards: String,
}

impl Default for BalanceState {
    fn default() -> Self {
        Self {
            usdc: "0".to_string(),
            deposits: "0".to_string(),
            rewards: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardsState {
    pub pending: String,
    pub accumulated: String,
    pub referral: String,
}

impl Default for RewardsState {
    fn default() -> Self {
        Self {
            pending: "0".to_string(),
            accumulated: "0".to_string(),
            referral: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankState {
    pub current: String,
    /// Bonus in percent
    pub bonus: f64,
    /// Progress towards the next rank in percent, 0..=100
    pub progress: f64,
}

impl Default for RankState {
    fn default() -> Self {
        Self {
            current: "Normal".to_string(),
            bonus: 0.0,
            progress: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionsState {
    pub pending: BTreeSet<String>,
    /// Newest first
    pub history: VecDeque<TransactionRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub is_loading: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

/// Vault operation a transaction performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    Approve,
    Deposit,
    Withdraw,
    ClaimRewards,
    ClaimReferralRewards,
    GenerateReferralCode,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Approve => write!(f, "approve"),
            TransactionKind::Deposit => write!(f, "deposit"),
            TransactionKind::Withdraw => write!(f, "withdraw"),
            TransactionKind::ClaimRewards => write!(f, "claim rewards"),
            TransactionKind::ClaimReferralRewards => write!(f, "claim referral rewards"),
            TransactionKind::GenerateReferralCode => write!(f, "generate referral code"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionInfo {
    pub fn new(status: TransactionStatus) -> Self {
        Self {
            status,
            kind: None,
            amount: None,
            error: None,
        }
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// A resolved transaction as kept in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    #[serde(flatten)]
    pub info: TransactionInfo,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Partial update of the whole tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub wallet: Option<WalletUpdate>,
    pub balance: Option<BalanceUpdate>,
    pub rewards: Option<RewardsUpdate>,
    pub rank: Option<RankUpdate>,
    pub transactions: Option<TransactionsUpdate>,
    pub loading: Option<LoadingUpdate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WalletUpdate {
    pub address: Option<String>,
    pub is_connected: Option<bool>,
    pub network_id: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceUpdate {
    pub usdc: Option<String>,
    pub deposits: Option<String>,
    pub rewards: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardsUpdate {
    pub pending: Option<String>,
    pub accumulated: Option<String>,
    pub referral: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankUpdate {
    pub current: Option<String>,
    pub bonus: Option<f64>,
    pub progress: Option<f64>,
}

/// Collections are replaced whole, never merged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionsUpdate {
    pub pending: Option<BTreeSet<String>>,
    pub history: Option<VecDeque<TransactionRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingUpdate {
    pub is_loading: Option<bool>,
    pub message: Option<String>,
}

impl From<AppState> for StateUpdate {
    fn from(state: AppState) -> Self {
        StateUpdate {
            wallet: Some(WalletUpdate {
                address: Some(state.wallet.address),
                is_connected: Some(state.wallet.is_connected),
                network_id: Some(state.wallet.network_id),
            }),
            balance: Some(BalanceUpdate {
                usdc: Some(state.balance.usdc),
                deposits: Some(state.balance.deposits),
                rewards: Some(state.balance.rewards),
            }),
            rewards: Some(RewardsUpdate {
                pending: Some(state.rewards.pending),
                accumulated: Some(state.rewards.accumulated),
                referral: Some(state.rewards.referral),
            }),
            rank: Some(RankUpdate {
                current: Some(state.rank.current),
                bonus: Some(state.rank.bonus),
                progress: Some(state.rank.progress),
            }),
            transactions: Some(TransactionsUpdate {
                pending: Some(state.transactions.pending),
                history: Some(state.transactions.history),
            }),
            loading: Some(LoadingUpdate {
                is_loading: Some(state.loading.is_loading),
                message: Some(state.loading.message),
            }),
        }
    }
}

/// Overwrite `slot` when `incoming` differs; record `path` if it is watched
fn assign<T: PartialEq>(
    slot: &mut T,
    incoming: Option<T>,
    path: &'static str,
    changes: &mut Vec<&'static str>,
) {
    let Some(value) = incoming else {
        return;
    };
    if *slot != value {
        *slot = value;
        if is_watched(path) {
            changes.push(path);
        }
    }
}

impl AppState {
    /// Merge `update` into the tree and return the watched paths that changed
    pub fn apply(&mut self, update: StateUpdate) -> Vec<&'static str> {
        let mut changes = Vec::new();

        if let Some(wallet) = update.wallet {
            let target = &mut self.wallet;
            assign(&mut target.address, wallet.address, "wallet.address", &mut changes);
            assign(
                &mut target.is_connected,
                wallet.is_connected,
                "wallet.isConnected",
                &mut changes,
            );
            assign(
                &mut target.network_id,
                wallet.network_id,
                "wallet.networkId",
                &mut changes,
            );
        }

        if let Some(balance) = update.balance {
            let target = &mut self.balance;
            assign(&mut target.usdc, balance.usdc, "balance.usdc", &mut changes);
            assign(
                &mut target.deposits,
                balance.deposits,
                "balance.deposits",
                &mut changes,
            );
            assign(
                &mut target.rewards,
                balance.rewards,
                "balance.rewards",
                &mut changes,
            );
        }

        if let Some(rewards) = update.rewards {
            let target = &mut self.rewards;
            assign(
                &mut target.pending,
                rewards.pending,
                "rewards.pending",
                &mut changes,
            );
            assign(
                &mut target.accumulated,
                rewards.accumulated,
                "rewards.accumulated",
                &mut changes,
            );
            assign(
                &mut target.referral,
                rewards.referral,
                "rewards.referral",
                &mut changes,
            );
        }

        if let Some(rank) = update.rank {
            let target = &mut self.rank;
            assign(&mut target.current, rank.current, "rank.current", &mut changes);
            assign(&mut target.bonus, rank.bonus, "rank.bonus", &mut changes);
            assign(&mut target.progress, rank.progress, "rank.progress", &mut changes);
        }

        if let Some(transactions) = update.transactions {
            let target = &mut self.transactions;
            assign(
                &mut target.pending,
                transactions.pending,
                "transactions.pending",
                &mut changes,
            );
            assign(
                &mut target.history,
                transactions.history,
                "transactions.history",
                &mut changes,
            );
        }

        if let Some(loading) = update.loading {
            let target = &mut self.loading;
            assign(
                &mut target.is_loading,
                loading.is_loading,
                "loading.isLoading",
                &mut changes,
            );
            assign(&mut target.message, loading.message, "loading.message", &mut changes);
        }

        changes
    }

    /// Current value of a watched string field
    pub fn watched_value(&self, path: &str) -> Option<&str> {
        match path {
            "wallet.address" => Some(&self.wallet.address),
            "balance.usdc" => Some(&self.balance.usdc),
            "balance.deposits" => Some(&self.balance.deposits),
            "rewards.pending" => Some(&self.rewards.pending),
            "rank.current" => Some(&self.rank.current),
            _ => None,
        }
    }

    /// Value at a dotted path such as `wallet.isConnected`
    pub fn value_at(&self, path: &str) -> Option<Value> {
        let mut current = serde_json::to_value(self).ok()?;
        for segment in path.split('.') {
            current = match current {
                Value::Object(mut map) => map.remove(segment)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Record a transaction outcome: pending hashes go into the pending set,
    /// anything else leaves it and is prepended to the bounded history
    pub fn record_transaction(&mut self, hash: &str, info: &TransactionInfo, timestamp: i64) {
        let transactions = &mut self.transactions;
        if info.status == TransactionStatus::Pending {
            transactions.pending.insert(hash.to_string());
            return;
        }

        transactions.pending.remove(hash);
        transactions.history.push_front(TransactionRecord {
            hash: hash.to_string(),
            info: info.clone(),
            timestamp,
        });
        transactions.history.truncate(HISTORY_LIMIT);
    }
}
