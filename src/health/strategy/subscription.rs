use super::{AcquisitionStrategy, StrategyKind};
use crate::error::Result;
use crate::health::pools::PoolWindows;
use crate::health::report::{format_current_stats, format_event};
use crate::jvm::filter::GcEventFilter;
use crate::jvm::introspection::{GcNotificationListener, ListenerId, NotificationEmitter};
use crate::jvm::types::{GcNotification, MAJOR_GC_END};
use crate::metrics::event::GarbageCollectionEvent;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Records one event per watched pool for each major collection the emitter
/// reports.
pub struct SubscriptionStrategy {
    emitter: Arc<dyn NotificationEmitter>,
    listener: Mutex<Option<ListenerId>>,
}

struct GcNotificationHandler {
    windows: Arc<PoolWindows>,
}

impl GcNotificationListener for GcNotificationHandler {
    fn handle_notification(&self, notification: &GcNotification) {
        for pool in self.windows.pool_names() {
            let Some(after) = notification.usage_after.get(pool) else {
                continue;
            };

            let event = GarbageCollectionEvent::notified(
                notification.timestamp_ms,
                notification.usage_before.get(pool).copied(),
                *after,
            );
            self.windows.record(pool, event);

            debug!(
                "Garbage Collection Event ({}): {}{}",
                pool,
                format_current_stats(&self.windows.stats(pool)),
                format_event(&event)
            );
        }
    }
}

impl SubscriptionStrategy {
    pub fn register(
        emitter: Arc<dyn NotificationEmitter>,
        collector: &str,
        windows: Arc<PoolWindows>,
    ) -> Result<Self> {
        let filter = GcEventFilter::new(collector, MAJOR_GC_END);
        let id = emitter.add_listener(filter, Arc::new(GcNotificationHandler { windows }))?;

        Ok(Self {
            emitter,
            listener: Mutex::new(Some(id)),
        })
    }
}

impl AcquisitionStrategy for SubscriptionStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Subscription
    }

    fn stop(&self) {
        let listener = self.listener.lock().take();
        if let Some(id) = listener {
            if let Err(e) = self.emitter.remove_listener(id) {
                warn!("Failed to remove GC notification listener: {}", e);
            }
        }
    }

    fn is_active(&self) -> bool {
        self.listener.lock().is_some()
    }
}
