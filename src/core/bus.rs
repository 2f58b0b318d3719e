//! Synchronous publish/subscribe registry
//!
//! Callbacks are keyed by [`EventKind`] and run in registration order on the
//! emitting thread. The registry lock is released before any callback runs,
//! so callbacks may subscribe, unsubscribe or emit again; a nested `emit`
//! completes before the outer delivery loop resumes.

use crate::core::events::{Event, EventKind};
use log::{debug, error, warn};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

/// What a listener returns; an `Err` is logged and otherwise ignored
pub type ListenerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

type Callback = dyn Fn(&Event) -> ListenerResult + Send + Sync;

struct Listener {
    id: u64,
    callback: Arc<Callback>,
}

type Registry = HashMap<EventKind, Vec<Listener>>;

pub struct EventBus {
    listeners: Arc<RwLock<Registry>>,
    next_id: AtomicU64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`EventBus::on`] and [`EventBus::once`]
///
/// Dropping the handle does not unregister the callback.
#[derive(Clone)]
pub struct Subscription {
    kind: EventKind,
    id: u64,
    registry: Weak<RwLock<Registry>>,
}

impl Subscription {
    /// Remove exactly this callback. Safe to call any number of times.
    pub fn unsubscribe(&self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut listeners = write_lock(&registry);
        if let Some(callbacks) = listeners.get_mut(&self.kind) {
            callbacks.retain(|listener| listener.id != self.id);
            if callbacks.is_empty() {
                listeners.remove(&self.kind);
            }
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl EventBus {
    pub fn new() -> EventBus {
        EventBus {
            listeners: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `callback` for every event of `kind`
    pub fn on<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&Event) -> ListenerResult + Send + Sync + 'static,
    {
        let subscription = self.allocate(kind);
        self.insert(kind, subscription.id, Arc::new(callback));
        subscription
    }

    /// Register `callback` for the next event of `kind` only
    pub fn once<F>(&self, kind: EventKind, callback: F) -> Subscription
    where
        F: Fn(&Event) -> ListenerResult + Send + Sync + 'static,
    {
        let subscription = self.allocate(kind);
        let handle = subscription.clone();
        let fired = AtomicBool::new(false);

        let wrapped = move |event: &Event| -> ListenerResult {
            // A re-entrant emit may still hold this callback in its snapshot
            if fired.swap(true, Ordering::SeqCst) {
                return Ok(());
            }
            handle.unsubscribe();
            callback(event)
        };

        self.insert(kind, subscription.id, Arc::new(wrapped));
        subscription
    }

    /// Deliver `event` to every callback registered for its kind
    pub fn emit(&self, event: Event) {
        let kind = event.kind();
        let callbacks: Vec<Arc<Callback>> = match self.read_registry().get(&kind) {
            Some(listeners) => listeners
                .iter()
                .map(|listener| Arc::clone(&listener.callback))
                .collect(),
            None => return,
        };

        debug!("Emitting {kind} to {} listener(s)", callbacks.len());

        for callback in callbacks {
            match catch_unwind(AssertUnwindSafe(|| callback(&event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Error in event listener for {kind}: {e}"),
                Err(panic) => error!(
                    "Event listener for {kind} panicked: {}",
                    panic_message(panic.as_ref())
                ),
            }
        }
    }

    /// Clear one kind, or the whole registry when `kind` is `None`
    pub fn remove_all_listeners(&self, kind: Option<EventKind>) {
        let mut listeners = write_lock(&self.listeners);
        match kind {
            Some(kind) => {
                listeners.remove(&kind);
            }
            None => listeners.clear(),
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.read_registry()
            .get(&kind)
            .map(|callbacks| callbacks.len())
            .unwrap_or(0)
    }

    /// Kinds that currently have at least one callback
    pub fn registered_kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = self.read_registry().keys().copied().collect();
        kinds.sort();
        kinds
    }

    fn allocate(&self, kind: EventKind) -> Subscription {
        Subscription {
            kind,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            registry: Arc::downgrade(&self.listeners),
        }
    }

    fn insert(&self, kind: EventKind, id: u64, callback: Arc<Callback>) {
        write_lock(&self.listeners)
            .entry(kind)
            .or_default()
            .push(Listener { id, callback });
    }

    fn read_registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.listeners.read().unwrap_or_else(|poisoned| {
            warn!("Listener registry lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

fn write_lock(registry: &RwLock<Registry>) -> RwLockWriteGuard<'_, Registry> {
    registry.write().unwrap_or_else(|poisoned| {
        warn!("Listener registry lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
