//! Core client state
//!
//! The event bus, the observable state store and the typed state and event
//! schemas they exchange, plus token amount helpers.

pub mod bus;
pub mod context;
pub mod events;
pub mod monetary;
pub mod state;
pub mod store;

pub use bus::{EventBus, ListenerResult, Subscription};
pub use context::AppContext;
pub use events::{AlertLevel, Event, EventKind, FieldUpdate};
pub use monetary::{
    format_units, from_usdc_units, parse_units, to_usdc_units, ETHER_DECIMALS, GWEI_DECIMALS,
    USDC_DECIMALS,
};
pub use state::{
    AppState, BalanceUpdate, LoadingUpdate, RankUpdate, RewardsUpdate, StateUpdate,
    TransactionInfo, TransactionKind, TransactionRecord, TransactionStatus, TransactionsUpdate,
    WalletUpdate, HISTORY_LIMIT, WATCHED_PATHS,
};
pub use store::Store;
