//! In-process notification emitter.

use crate::error::{MonitorError, Result};
use crate::jvm::filter::GcEventFilter;
use crate::jvm::introspection::{GcNotificationListener, ListenerId, NotificationEmitter};
use crate::jvm::types::GcNotification;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct Registration {
    id: ListenerId,
    filter: GcEventFilter,
    listener: Arc<dyn GcNotificationListener>,
}

/// Dispatches notifications to registered listeners on the emitting thread.
///
/// Matching listeners are collected under the read lock and invoked after it
/// is released, so a listener may add or remove registrations.
#[derive(Default)]
pub struct LocalEmitter {
    registrations: RwLock<Vec<Registration>>,
    next_id: AtomicU64,
}

impl LocalEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `notification` to every listener whose filter accepts it and
    /// returns how many were invoked.
    pub fn emit(&self, notification: &GcNotification) -> usize {
        let targets: Vec<Arc<dyn GcNotificationListener>> = self
            .registrations
            .read()
            .iter()
            .filter(|registration| registration.filter.is_enabled(notification))
            .map(|registration| Arc::clone(&registration.listener))
            .collect();

        for listener in &targets {
            listener.handle_notification(notification);
        }
        targets.len()
    }

    pub fn listener_count(&self) -> usize {
        self.registrations.read().len()
    }
}

impl NotificationEmitter for LocalEmitter {
    fn add_listener(
        &self,
        filter: GcEventFilter,
        listener: Arc<dyn GcNotificationListener>,
    ) -> Result<ListenerId> {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.registrations.write().push(Registration {
            id,
            filter,
            listener,
        });
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> Result<()> {
        let mut registrations = self.registrations.write();
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        if registrations.len() == before {
            return Err(MonitorError::UnknownListener(id.0));
        }
        Ok(())
    }
}
