use crate::config::Settings;
use crate::core::bus::EventBus;
use crate::core::store::Store;
use crate::notify::AlertCenter;
use std::sync::Arc;

/// Shared handles every component is constructed with
///
/// Cloning is cheap and yields handles to the same bus, store and alerts.
/// Each call to [`AppContext::new`] creates an isolated instance.
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub bus: Arc<EventBus>,
    pub store: Arc<Store>,
    pub alerts: Arc<AlertCenter>,
}

impl AppContext {
    pub fn new(settings: Settings) -> AppContext {
        let bus = Arc::new(EventBus::new());
        let store = Arc::new(Store::new(Arc::clone(&bus)));
        let alerts = Arc::new(AlertCenter::new(
            Arc::clone(&bus),
            settings.alerts.clone(),
        ));
        AppContext {
            settings: Arc::new(settings),
            bus,
            store,
            alerts,
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::{Event, EventKind};

    #[test]
    fn test_contexts_are_isolated() {
        let first = AppContext::default();
        let second = AppContext::default();

        first.bus.on(EventKind::WalletError, |_| Ok(()));
        assert_eq!(first.bus.listener_count(EventKind::WalletError), 1);
        assert_eq!(second.bus.listener_count(EventKind::WalletError), 0);
    }

    #[test]
    fn test_store_and_alerts_share_the_bus() {
        let ctx = AppContext::default();
        let shared = ctx.clone();
        ctx.bus.on(EventKind::AlertShown, |_| Ok(()));
        assert_eq!(shared.bus.listener_count(EventKind::AlertShown), 1);
        assert!(Arc::ptr_eq(ctx.store.bus(), &shared.bus));

        ctx.bus.emit(Event::WalletError {
            error: "unused".to_string(),
        });
    }
}
