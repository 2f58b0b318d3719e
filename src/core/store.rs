use crate::core::bus::EventBus;
use crate::core::events::{Event, FieldUpdate};
use crate::core::state::{AppState, LoadingUpdate, StateUpdate, TransactionInfo};
use crate::utils::current_timestamp;
use log::{debug, warn};
use serde_json::Value;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Observable application state
///
/// Every mutation goes through [`Store::update_state`] (or one of the helpers
/// built on it) and is broadcast on the shared [`EventBus`]. The state lock is
/// never held while events are delivered, so listeners can read the store.
pub struct Store {
    state: RwLock<AppState>,
    bus: Arc<EventBus>,
}

impl Store {
    pub fn new(bus: Arc<EventBus>) -> Store {
        Store {
            state: RwLock::new(AppState::default()),
            bus,
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Merge `update` into the tree.
    ///
    /// Unless `silent`, a change to at least one watched path emits
    /// `state:updated`, followed by `balance:updated` / `rewards:updated` for
    /// each changed path in those namespaces. Changes to unwatched paths are
    /// applied without any event.
    pub fn update_state(&self, update: StateUpdate, silent: bool) {
        let (changes, snapshot) = {
            let mut state = self.write_state();
            let changes = state.apply(update);
            if silent || changes.is_empty() {
                return;
            }
            (changes, state.clone())
        };

        debug!("State changed: {changes:?}");

        self.bus.emit(Event::StateUpdated {
            changes: changes.iter().map(|path| path.to_string()).collect(),
            state: Box::new(snapshot),
        });

        for path in changes {
            let Some((namespace, field)) = path.split_once('.') else {
                continue;
            };
            let value = self
                .read_state()
                .watched_value(path)
                .map(str::to_string)
                .unwrap_or_default();
            let update = FieldUpdate {
                field: field.to_string(),
                value,
            };
            match namespace {
                "balance" => self.bus.emit(Event::BalanceUpdated(update)),
                "rewards" => self.bus.emit(Event::RewardsUpdated(update)),
                _ => {}
            }
        }
    }

    /// Snapshot of the whole tree
    pub fn get_state(&self) -> AppState {
        self.read_state().clone()
    }

    /// Value at a dotted path, `None` if any segment is missing
    pub fn get_path(&self, path: &str) -> Option<Value> {
        self.read_state().value_at(path)
    }

    /// Track a transaction and broadcast `transaction:updated`
    pub fn update_transaction(&self, hash: &str, info: TransactionInfo) {
        let timestamp = current_timestamp().unwrap_or_else(|e| {
            warn!("Could not read the clock for transaction {hash}: {e}");
            0
        });
        self.write_state().record_transaction(hash, &info, timestamp);

        self.bus.emit(Event::TransactionUpdated {
            hash: hash.to_string(),
            info,
        });
    }

    pub fn set_loading(&self, is_loading: bool, message: impl Into<String>) {
        self.update_state(
            StateUpdate {
                loading: Some(LoadingUpdate {
                    is_loading: Some(is_loading),
                    message: Some(message.into()),
                }),
                ..Default::default()
            },
            false,
        );
    }

    /// Restore every namespace to its initial value
    pub fn reset_state(&self) {
        self.update_state(StateUpdate::from(AppState::default()), false);
    }

    fn read_state(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!("State lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!("State lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
