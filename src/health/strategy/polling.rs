use super::{AcquisitionStrategy, StrategyKind};
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::health::pools::PoolWindows;
use crate::health::report::{format_current_stats, format_event};
use crate::health::scheduler::{Cancellable, ScheduledTask, Scheduler};
use crate::jvm::introspection::RuntimeIntrospection;
use crate::metrics::event::GarbageCollectionEvent;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Samples the collector counter and pool usage on every scheduler tick.
pub struct PollingStrategy {
    task: Mutex<Option<Box<dyn Cancellable>>>,
}

struct GcCheck {
    introspection: Arc<dyn RuntimeIntrospection>,
    collector: String,
    windows: Arc<PoolWindows>,
    tick_timeout: Duration,
}

impl GcCheck {
    /// Returns the number of events recorded.
    async fn check(&self) -> Result<usize> {
        let counts = self.introspection.collector_counts().await?;
        let Some(collector) = counts.iter().find(|count| count.name == self.collector) else {
            debug!("Garbage collector {} not found, skipping check", self.collector);
            return Ok(0);
        };

        let pools = self.introspection.memory_pools().await?;
        let now = Utc::now().timestamp_millis();
        let mut recorded = 0;

        for pool in pools {
            let event = GarbageCollectionEvent::sampled(now, pool.usage, collector.collection_count);
            if !self.windows.record(&pool.name, event) {
                continue;
            }
            recorded += 1;

            debug!(
                "Garbage Collection Check ({}): {}{}",
                pool.name,
                format_current_stats(&self.windows.stats(&pool.name)),
                format_event(&event)
            );
        }

        Ok(recorded)
    }
}

#[async_trait]
impl ScheduledTask for GcCheck {
    async fn run(&self) {
        match timeout(self.tick_timeout, self.check()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => debug!("Garbage collection check failed: {}", e),
            Err(_) => debug!(
                "Garbage collection check exceeded {:?}, skipping",
                self.tick_timeout
            ),
        }
    }
}

impl PollingStrategy {
    pub fn schedule(
        scheduler: &dyn Scheduler,
        introspection: Arc<dyn RuntimeIntrospection>,
        collector: &str,
        windows: Arc<PoolWindows>,
        config: &MonitorConfig,
    ) -> Self {
        let check = GcCheck {
            introspection,
            collector: collector.to_string(),
            windows,
            tick_timeout: config.tick_timeout,
        };

        let task = scheduler.schedule_with_fixed_delay(
            Arc::new(check),
            config.poll_initial_delay,
            config.poll_interval,
        );

        Self {
            task: Mutex::new(Some(task)),
        }
    }
}

impl AcquisitionStrategy for PollingStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Polling
    }

    fn stop(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task {
            task.cancel();
        }
    }

    fn is_active(&self) -> bool {
        self.task.lock().is_some()
    }
}
