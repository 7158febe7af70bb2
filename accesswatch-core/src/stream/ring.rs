use std::collections::VecDeque;

/// Fixed-capacity ordered sequence.
///
/// Storage is allocated once; inserting into a full ring evicts from the
/// opposite end first, so the length never exceeds `capacity`.
#[derive(Debug, Clone)]
pub struct BoundedRing<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedRing<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append at the back, evicting the front (oldest) when full.
    pub fn push_back(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Insert at the front, evicting the back (oldest) when full.
    pub fn push_front(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_back()
        } else {
            None
        };
        self.items.push_front(item);
        evicted
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

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Clone> BoundedRing<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}
