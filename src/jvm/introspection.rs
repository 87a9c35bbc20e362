use crate::error::Result;
use crate::jvm::filter::GcEventFilter;
use crate::jvm::types::{CollectorCount, GcNotification, MemoryPoolUsage, RuntimeIdentity};
use async_trait::async_trait;
use std::sync::Arc;

/// Read access to a running JVM's memory management state.
#[async_trait]
pub trait RuntimeIntrospection: Send + Sync {
    async fn runtime_identity(&self) -> Result<RuntimeIdentity>;

    /// Usage of every memory pool as measured after its last collection.
    async fn memory_pools(&self) -> Result<Vec<MemoryPoolUsage>>;

    async fn collector_counts(&self) -> Result<Vec<CollectorCount>>;

    /// Push source for collection notifications, if the backend has one.
    fn notification_emitter(&self) -> Option<Arc<dyn NotificationEmitter>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

pub trait GcNotificationListener: Send + Sync {
    fn handle_notification(&self, notification: &GcNotification);
}

impl<F> GcNotificationListener for F
where
    F: Fn(&GcNotification) + Send + Sync,
{
    fn handle_notification(&self, notification: &GcNotification) {
        self(notification)
    }
}

/// Subscribable stream of collection notifications. Listeners may be invoked
/// from any thread, including several at once.
pub trait NotificationEmitter: Send + Sync {
    fn add_listener(
        &self,
        filter: GcEventFilter,
        listener: Arc<dyn GcNotificationListener>,
    ) -> Result<ListenerId>;

    fn remove_listener(&self, id: ListenerId) -> Result<()>;
}
