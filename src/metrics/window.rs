//! Thread-safe sliding window over the most recent observations.

use crate::metrics::ring_buffer::RingBuffer;
use parking_lot::Mutex;

/// Fixed-capacity, insertion-ordered window with FIFO eviction.
///
/// Producers (notification threads or the polling task) call
/// [`slide_and_insert`](Self::slide_and_insert) while consumers take
/// [`snapshot`](Self::snapshot)s at arbitrary times. A single mutex guards the
/// buffer, so an insert and its eviction are one step from the point of view of
/// any snapshot.
#[derive(Debug)]
pub struct SlidingWindow<T: Clone> {
    inner: Mutex<RingBuffer<T>>,
}

impl<T: Clone> SlidingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(RingBuffer::new(capacity)),
        }
    }

    pub fn slide_and_insert(&self, item: T) {
        self.inner.lock().push(item);
    }

    /// Oldest-first copy taken at a single instant.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn total_inserted(&self) -> u64 {
        self.inner.lock().total_pushed()
    }
}
