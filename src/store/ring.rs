use std::collections::VecDeque;

/// Fixed-capacity FIFO: pushing onto a full buffer evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        while self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }
}

impl<T: Clone> BoundedBuffer<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_past_capacity() {
        let mut buf = BoundedBuffer::new(3);
        for i in 0..4 {
            buf.push(i);
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.to_vec(), vec![1, 2, 3]);
        assert_eq!(buf.latest(), Some(&3));
    }

    #[test]
    fn keeps_everything_under_capacity() {
        let mut buf = BoundedBuffer::new(5);
        buf.push("a");
        buf.push("b");
        assert_eq!(buf.to_vec(), vec!["a", "b"]);
        assert_eq!(buf.capacity(), 5);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut buf = BoundedBuffer::new(0);
        buf.push(1.0);
        assert!(buf.is_empty());
    }
}
