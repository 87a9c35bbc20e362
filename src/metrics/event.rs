use crate::jvm::types::MemoryUsage;
use serde::Serialize;

/// One observed collection cycle for a single memory pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GarbageCollectionEvent {
    timestamp_ms: i64,
    usage: MemoryUsage,
    usage_before: Option<MemoryUsage>,
    collection_count: Option<u64>,
}

impl GarbageCollectionEvent {
    pub fn new(timestamp_ms: i64, usage: MemoryUsage) -> Self {
        Self {
            timestamp_ms,
            usage,
            usage_before: None,
            collection_count: None,
        }
    }

    /// Event sampled by the poller, tagged with the collector's cumulative
    /// cycle count at sampling time.
    pub fn sampled(timestamp_ms: i64, usage: MemoryUsage, collection_count: u64) -> Self {
        Self {
            collection_count: Some(collection_count),
            ..Self::new(timestamp_ms, usage)
        }
    }

    /// Event reported by a notification that carries usage before and after
    /// the cycle.
    pub fn notified(timestamp_ms: i64, before: Option<MemoryUsage>, after: MemoryUsage) -> Self {
        Self {
            usage_before: before,
            ..Self::new(timestamp_ms, after)
        }
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    /// Pool usage after the collection.
    pub fn usage(&self) -> &MemoryUsage {
        &self.usage
    }

    pub fn usage_before(&self) -> Option<&MemoryUsage> {
        self.usage_before.as_ref()
    }

    pub fn collection_count(&self) -> Option<u64> {
        self.collection_count
    }

    /// Bytes freed by the cycle, when the before-usage is known.
    pub fn reclaimed(&self) -> Option<u64> {
        self.usage_before
            .map(|before| before.used.saturating_sub(self.usage.used))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampled_event_carries_count() {
        let event = GarbageCollectionEvent::sampled(42, MemoryUsage::new(10, 20, Some(40)), 7);
        assert_eq!(event.timestamp_ms(), 42);
        assert_eq!(event.collection_count(), Some(7));
        assert_eq!(event.usage_before(), None);
        assert_eq!(event.reclaimed(), None);
    }

    #[test]
    fn test_reclaimed_bytes() {
        let before = MemoryUsage::new(900, 1000, Some(1000));
        let after = MemoryUsage::new(300, 1000, Some(1000));
        let event = GarbageCollectionEvent::notified(1, Some(before), after);

        assert_eq!(event.reclaimed(), Some(600));
        assert_eq!(event.usage().used, 300);
        assert_eq!(event.collection_count(), None);
    }

    #[test]
    fn test_reclaimed_never_underflows() {
        let before = MemoryUsage::new(100, 1000, Some(1000));
        let after = MemoryUsage::new(150, 1000, Some(1000));
        let event = GarbageCollectionEvent::notified(1, Some(before), after);

        assert_eq!(event.reclaimed(), Some(0));
    }
}
