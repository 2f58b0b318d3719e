use crate::config::AlertSettings;
use crate::core::bus::EventBus;
use crate::core::events::{AlertLevel, Event};
use crate::utils::current_timestamp;
use log::{info, warn};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard};

/// A user-facing notification
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: String,
    pub message: String,
    pub level: AlertLevel,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    /// Zero keeps the alert until it is removed explicitly
    pub duration_ms: u64,
}

impl Alert {
    pub fn is_expired(&self, now: i64) -> bool {
        self.duration_ms > 0 && now >= self.created_at + self.duration_ms as i64
    }
}

/// Bounded set of visible alerts, oldest first
pub struct AlertCenter {
    bus: Arc<EventBus>,
    settings: AlertSettings,
    active: RwLock<VecDeque<Alert>>,
    counter: AtomicU64,
}

impl AlertCenter {
    pub fn new(bus: Arc<EventBus>, settings: AlertSettings) -> AlertCenter {
        AlertCenter {
            bus,
            settings,
            active: RwLock::new(VecDeque::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// Show an alert for the configured default duration
    pub fn show(&self, message: impl Into<String>, level: AlertLevel) -> String {
        self.show_for(message, level, self.settings.duration_ms)
    }

    /// Show an alert, evicting the oldest ones beyond the limit
    pub fn show_for(&self, message: impl Into<String>, level: AlertLevel, duration_ms: u64) -> String {
        let id = format!("alert-{}", self.counter.fetch_add(1, Ordering::Relaxed) + 1);
        let alert = Alert {
            id: id.clone(),
            message: message.into(),
            level,
            created_at: current_timestamp().unwrap_or_default(),
            duration_ms,
        };
        info!("[{level}] {}", alert.message);

        let evicted: Vec<String> = {
            let mut active = self.write_active();
            let mut evicted = Vec::new();
            while active.len() >= self.settings.max_alerts.max(1) {
                match active.pop_front() {
                    Some(oldest) => evicted.push(oldest.id),
                    None => break,
                }
            }
            active.push_back(alert.clone());
            evicted
        };

        for old in evicted {
            self.bus.emit(Event::AlertRemoved { id: old });
        }
        self.bus.emit(Event::AlertShown {
            id: id.clone(),
            message: alert.message,
            level,
        });
        id
    }

    /// Remove one alert; returns whether it was still active
    pub fn remove(&self, id: &str) -> bool {
        let removed = {
            let mut active = self.write_active();
            let before = active.len();
            active.retain(|alert| alert.id != id);
            active.len() != before
        };
        if removed {
            self.bus.emit(Event::AlertRemoved { id: id.to_string() });
        }
        removed
    }

    pub fn clear_all(&self) {
        let cleared: Vec<Alert> = self.write_active().drain(..).collect();
        for alert in cleared {
            self.bus.emit(Event::AlertRemoved { id: alert.id });
        }
    }

    /// Drop alerts whose display time has passed
    pub fn prune_expired(&self, now: i64) -> usize {
        let expired: Vec<String> = {
            let mut active = self.write_active();
            let expired = active
                .iter()
                .filter(|alert| alert.is_expired(now))
                .map(|alert| alert.id.clone())
                .collect();
            active.retain(|alert| !alert.is_expired(now));
            expired
        };
        let count = expired.len();
        for id in expired {
            self.bus.emit(Event::AlertRemoved { id });
        }
        count
    }

    pub fn active(&self) -> Vec<Alert> {
        match self.active.read() {
            Ok(active) => active.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    fn write_active(&self) -> RwLockWriteGuard<'_, VecDeque<Alert>> {
        self.active.write().unwrap_or_else(|poisoned| {
            warn!("Alert lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
