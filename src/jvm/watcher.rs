//! Turns counter sampling into push notifications.
//!
//! Backends such as `jstat` or Jolokia only expose cumulative counters. The
//! watcher samples them on its own task and emits one notification whenever a
//! collector's count moves, carrying pool usage before and after.

use crate::error::Result;
use crate::jvm::emitter::LocalEmitter;
use crate::jvm::introspection::{NotificationEmitter, RuntimeIntrospection};
use crate::jvm::types::{
    CollectorCount, GcNotification, MemoryPoolUsage, MemoryUsage, RuntimeIdentity, MAJOR_GC_END,
    MINOR_GC_END,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

#[derive(Debug, Clone)]
struct Sample {
    timestamp_ms: i64,
    counts: Vec<CollectorCount>,
    pools: HashMap<String, MemoryUsage>,
}

impl Sample {
    async fn take(source: &dyn RuntimeIntrospection) -> Result<Self> {
        let counts = source.collector_counts().await?;
        let pools = source
            .memory_pools()
            .await?
            .into_iter()
            .map(|pool| (pool.name, pool.usage))
            .collect();

        Ok(Self {
            timestamp_ms: Utc::now().timestamp_millis(),
            counts,
            pools,
        })
    }
}

fn notifications_between(previous: &Sample, current: &Sample) -> Vec<GcNotification> {
    current
        .counts
        .iter()
        .filter(|count| {
            previous
                .counts
                .iter()
                .any(|prev| prev.name == count.name && count.collection_count > prev.collection_count)
        })
        .map(|count| GcNotification {
            collector_name: count.name.clone(),
            action: if count.is_major {
                MAJOR_GC_END
            } else {
                MINOR_GC_END
            }
            .to_string(),
            cause: None,
            timestamp_ms: current.timestamp_ms,
            usage_before: previous.pools.clone(),
            usage_after: current.pools.clone(),
        })
        .collect()
}

/// Decorates an introspection backend with a notification emitter fed by a
/// background sampling task.
pub struct WatchedIntrospection {
    inner: Arc<dyn RuntimeIntrospection>,
    emitter: Arc<LocalEmitter>,
    watcher: Mutex<Option<AbortHandle>>,
}

impl WatchedIntrospection {
    /// Starts the sampling task on the current tokio runtime.
    pub fn spawn(inner: Arc<dyn RuntimeIntrospection>, watch_interval: Duration) -> Arc<Self> {
        let emitter = Arc::new(LocalEmitter::new());
        let task = tokio::spawn(watch(
            Arc::clone(&inner),
            Arc::clone(&emitter),
            watch_interval,
        ));

        Arc::new(Self {
            inner,
            emitter,
            watcher: Mutex::new(Some(task.abort_handle())),
        })
    }

    pub fn shutdown(&self) {
        if let Some(handle) = self.watcher.lock().take() {
            handle.abort();
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.lock().is_some()
    }
}

impl Drop for WatchedIntrospection {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn watch(
    source: Arc<dyn RuntimeIntrospection>,
    emitter: Arc<LocalEmitter>,
    watch_interval: Duration,
) {
    let mut ticker = tokio::time::interval(watch_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut previous: Option<Sample> = None;

    loop {
        ticker.tick().await;

        let current = match Sample::take(source.as_ref()).await {
            Ok(sample) => sample,
            Err(e) => {
                debug!("Skipping collection sample: {}", e);
                continue;
            }
        };

        if let Some(previous) = &previous {
            for notification in notifications_between(previous, &current) {
                emitter.emit(&notification);
            }
        }
        previous = Some(current);
    }
}

#[async_trait]
impl RuntimeIntrospection for WatchedIntrospection {
    async fn runtime_identity(&self) -> Result<RuntimeIdentity> {
        self.inner.runtime_identity().await
    }

    async fn memory_pools(&self) -> Result<Vec<MemoryPoolUsage>> {
        self.inner.memory_pools().await
    }

    async fn collector_counts(&self) -> Result<Vec<CollectorCount>> {
        self.inner.collector_counts().await
    }

    fn notification_emitter(&self) -> Option<Arc<dyn NotificationEmitter>> {
        let emitter: Arc<dyn NotificationEmitter> = self.emitter.clone();
        Some(emitter)
    }
}
