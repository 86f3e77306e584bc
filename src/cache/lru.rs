//! Recency Queue Module
//!
//! Tracks access order for LRU eviction.

use std::time::Instant;

use crate::cache::queue::{Node, SlabQueue};

// == Recency Queue ==
/// Orders keys by last access.
///
/// Keys are stored in a slab queue where:
/// - Head = Least recently used
/// - Tail = Most recently used
#[derive(Debug, Clone)]
pub struct RecencyQueue<K> {
    queue: SlabQueue<K>,
}

impl<K> RecencyQueue<K> {
    // == Constructor ==
    /// Creates a new empty recency queue with room for `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: SlabQueue::new(capacity),
        }
    }

    // == Touch ==
    /// Records `key` as the most recently used and returns its slot index.
    pub fn touch(&mut self, key: K, now: Instant) -> usize {
        self.queue.push(key, now)
    }

    // == Refresh ==
    /// Moves the key held at `idx` to the most recently used position.
    ///
    /// Returns the key's new slot index.
    ///
    /// # Panics
    /// Panics if `idx` is a free slot; callers only hold indices of live keys.
    pub fn refresh(&mut self, idx: usize, now: Instant) -> usize {
        match self.queue.take(idx) {
            Some(node) => self.queue.push(node.value, now),
            None => panic!("recency queue refresh of free slot {}", idx),
        }
    }

    // == Remove ==
    /// Removes the key held at `idx`. Returns false if the slot was free.
    pub fn remove(&mut self, idx: usize) -> bool {
        self.queue.delete(idx)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the queue is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        self.queue.pop().map(|node| node.value)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&K> {
        self.queue.top().map(|node| &node.value)
    }

    /// Returns the node held at `idx`.
    pub fn get(&self, idx: usize) -> Option<&Node<K>> {
        self.queue.get(idx)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.queue.debug_validate_invariants();
    }
}
