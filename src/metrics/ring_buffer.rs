use std::collections::VecDeque;

/// Bounded FIFO buffer: once `capacity` items are held, every push evicts the
/// oldest one.
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Clone> {
    buffer: VecDeque<T>,
    capacity: usize,
    total: u64,
}

impl<T: Clone> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be > 0");
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            total: 0,
        }
    }

    /// Appends `item`, returning the evicted element if the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.buffer.len() >= self.capacity {
            self.buffer.pop_front()
        } else {
            None
        };
        self.buffer.push_back(item);
        self.total += 1;
        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    /// Oldest-first copy of the current contents.
    pub fn to_vec(&self) -> Vec<T> {
        self.buffer.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items ever pushed, including evicted ones.
    pub fn total_pushed(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_buffer_basic() {
        let mut buffer = RingBuffer::new(3);
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);

        buffer.push(1);
        buffer.push(2);
        buffer.push(3);

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_ring_buffer_overflow_returns_evicted() {
        let mut buffer = RingBuffer::new(3);

        assert_eq!(buffer.push(1), None);
        buffer.push(2);
        buffer.push(3);
        assert_eq!(buffer.push(4), Some(1));

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.to_vec(), vec![2, 3, 4]);

        buffer.push(5);
        buffer.push(6);

        let values: Vec<_> = buffer.iter().copied().collect();
        assert_eq!(values, vec![4, 5, 6]);
        assert_eq!(buffer.total_pushed(), 6);
        assert_eq!(buffer.capacity(), 3);
    }

    #[test]
    fn test_ring_buffer_with_strings() {
        let mut buffer = RingBuffer::new(2);

        buffer.push("first".to_string());
        buffer.push("second".to_string());
        buffer.push("third".to_string());

        let values: Vec<_> = buffer.iter().map(|s| s.as_str()).collect();
        assert_eq!(values, vec!["second", "third"]);
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_rejected() {
        let _ = RingBuffer::<u8>::new(0);
    }
}
