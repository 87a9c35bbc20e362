//! In-memory introspection backend for tests.

use crate::error::{MonitorError, Result};
use crate::jvm::emitter::LocalEmitter;
use crate::jvm::introspection::{NotificationEmitter, RuntimeIntrospection};
use crate::jvm::types::{CollectorCount, MemoryPoolUsage, MemoryUsage, PoolType, RuntimeIdentity};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct FakeIntrospection {
    identity: Mutex<Option<RuntimeIdentity>>,
    pools: Mutex<Vec<MemoryPoolUsage>>,
    counts: Mutex<Vec<CollectorCount>>,
    emitter: Option<Arc<LocalEmitter>>,
    pool_reads: AtomicUsize,
    pool_delay: Mutex<Option<Duration>>,
    counts_fail: AtomicBool,
}

impl FakeIntrospection {
    pub fn new(identity: Option<RuntimeIdentity>) -> Self {
        Self {
            identity: Mutex::new(identity),
            pools: Mutex::new(Vec::new()),
            counts: Mutex::new(Vec::new()),
            emitter: None,
            pool_reads: AtomicUsize::new(0),
            pool_delay: Mutex::new(None),
            counts_fail: AtomicBool::new(false),
        }
    }

    pub fn hotspot() -> Self {
        Self::new(Some(RuntimeIdentity::new("Oracle Corporation", "1.8.0_402")))
    }

    pub fn with_emitter(mut self, emitter: Arc<LocalEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn set_pool(&self, name: &str, pool_type: PoolType, usage: MemoryUsage) {
        let mut pools = self.pools.lock();
        pools.retain(|pool| pool.name != name);
        pools.push(MemoryPoolUsage {
            name: name.to_string(),
            pool_type,
            usage,
        });
    }

    pub fn set_count(&self, name: &str, collection_count: u64, is_major: bool) {
        let mut counts = self.counts.lock();
        counts.retain(|count| count.name != name);
        counts.push(CollectorCount {
            name: name.to_string(),
            collection_count,
            is_major,
        });
    }

    /// Replaces every pool and counter, as a fresh backend sample would.
    pub fn set_sample(&self, pools: Vec<MemoryPoolUsage>, counts: Vec<CollectorCount>) {
        *self.pools.lock() = pools;
        *self.counts.lock() = counts;
    }

    /// Makes every `memory_pools` call sleep for `delay` first.
    pub fn set_pool_delay(&self, delay: Option<Duration>) {
        *self.pool_delay.lock() = delay;
    }

    pub fn set_counts_failing(&self, failing: bool) {
        self.counts_fail.store(failing, Ordering::SeqCst);
    }

    pub fn pool_reads(&self) -> usize {
        self.pool_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuntimeIntrospection for FakeIntrospection {
    async fn runtime_identity(&self) -> Result<RuntimeIdentity> {
        self.identity
            .lock()
            .clone()
            .ok_or_else(|| MonitorError::Connection("identity unavailable".to_string()))
    }

    async fn memory_pools(&self) -> Result<Vec<MemoryPoolUsage>> {
        self.pool_reads.fetch_add(1, Ordering::SeqCst);
        let delay = *self.pool_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.pools.lock().clone())
    }

    async fn collector_counts(&self) -> Result<Vec<CollectorCount>> {
        if self.counts_fail.load(Ordering::SeqCst) {
            return Err(MonitorError::Connection("jstat exited".to_string()));
        }
        Ok(self.counts.lock().clone())
    }

    fn notification_emitter(&self) -> Option<Arc<dyn NotificationEmitter>> {
        self.emitter
            .clone()
            .map(|emitter| emitter as Arc<dyn NotificationEmitter>)
    }
}
