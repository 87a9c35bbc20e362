use crate::metrics::event::GarbageCollectionEvent;
use crate::metrics::stats::GarbageCollectionStats;
use crate::metrics::window::SlidingWindow;
use std::collections::HashMap;

/// One event window per watched memory pool. The set of pools is fixed at
/// construction; events for any other pool are dropped.
#[derive(Debug)]
pub struct PoolWindows {
    windows: HashMap<String, SlidingWindow<GarbageCollectionEvent>>,
}

impl PoolWindows {
    pub fn new<'a>(pool_names: impl IntoIterator<Item = &'a str>, capacity: usize) -> Self {
        Self {
            windows: pool_names
                .into_iter()
                .map(|name| (name.to_string(), SlidingWindow::new(capacity)))
                .collect(),
        }
    }

    /// Returns `false` when `pool` is not watched.
    pub fn record(&self, pool: &str, event: GarbageCollectionEvent) -> bool {
        match self.windows.get(pool) {
            Some(window) => {
                window.slide_and_insert(event);
                true
            }
            None => false,
        }
    }

    pub fn pool_names(&self) -> impl Iterator<Item = &str> {
        self.windows.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn snapshot(&self, pool: &str) -> Option<Vec<GarbageCollectionEvent>> {
        self.windows.get(pool).map(SlidingWindow::snapshot)
    }

    /// Stats over the pool's current window; empty stats for a pool that is
    /// not watched.
    pub fn stats(&self, pool: &str) -> GarbageCollectionStats {
        match self.snapshot(pool) {
            Some(events) => GarbageCollectionStats::from_events(pool, &events),
            None => GarbageCollectionStats::empty(pool),
        }
    }
}
