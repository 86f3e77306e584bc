//! Expiry Queue Module
//!
//! Orders keys by expiration instant.

use std::time::Instant;

use crate::cache::queue::{Node, SlabQueue};

// == Expiry Queue ==
/// FIFO of keys stamped with their expiration instant.
///
/// Every entry in a cache shares one TTL, so push order is expiration order
/// and the head is always the key that expires soonest. Pushes must therefore
/// carry non-decreasing expiration instants.
#[derive(Debug, Clone)]
pub struct ExpiryQueue<K> {
    queue: SlabQueue<K>,
}

impl<K> ExpiryQueue<K> {
    /// Creates a new empty expiry queue with room for `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: SlabQueue::new(capacity),
        }
    }

    /// Appends `key`, expiring at `expires_at`, and returns its slot index.
    pub fn push(&mut self, key: K, expires_at: Instant) -> usize {
        debug_assert!(
            self.queue
                .back()
                .map_or(true, |tail| tail.timestamp <= expires_at),
            "expiry queue pushes must be ordered by expiration"
        );
        self.queue.push(key, expires_at)
    }

    /// Removes and returns the node that expires soonest.
    pub fn pop(&mut self) -> Option<Node<K>> {
        self.queue.pop()
    }

    /// Removes the key held at `idx`. Returns false if the slot was free.
    pub fn remove(&mut self, idx: usize) -> bool {
        self.queue.delete(idx)
    }

    /// Returns the node that expires soonest without removing it.
    pub fn top(&self) -> Option<&Node<K>> {
        self.queue.top()
    }

    // == Is Any Expired ==
    /// Checks whether the head has outlived its TTL.
    ///
    /// Boundary condition: a node expires once `now` is strictly after its
    /// expiration instant; at the instant itself it is still live.
    pub fn is_any_expired(&self, now: Instant) -> bool {
        self.top().map_or(false, |node| now > node.timestamp)
    }

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

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_expiry_empty_never_expired() {
        let queue: ExpiryQueue<&str> = ExpiryQueue::new(2);
        assert!(!queue.is_any_expired(Instant::now() + Duration::from_secs(3600)));
    }

    #[test]
    fn test_expiry_boundary_condition() {
        let mut queue = ExpiryQueue::new(2);
        let expires_at = Instant::now() + Duration::from_secs(10);
        queue.push("a", expires_at);

        assert!(!queue.is_any_expired(expires_at - Duration::from_secs(1)));
        // Still live at the exact expiration instant
        assert!(!queue.is_any_expired(expires_at));
        assert!(queue.is_any_expired(expires_at + Duration::from_nanos(1)));
    }

    #[test]
    fn test_expiry_head_is_soonest() {
        let mut queue = ExpiryQueue::new(3);
        let base = Instant::now();

        queue.push("a", base + Duration::from_secs(1));
        queue.push("b", base + Duration::from_secs(2));
        queue.push("c", base + Duration::from_secs(3));

        let now = base + Duration::from_millis(2500);
        let mut expired = Vec::new();
        while queue.is_any_expired(now) {
            expired.push(queue.pop().map(|n| n.value));
        }

        assert_eq!(expired, vec![Some("a"), Some("b")]);
        assert_eq!(queue.top().map(|n| n.value), Some("c"));
    }

    #[test]
    fn test_expiry_remove_head_exposes_next() {
        let mut queue = ExpiryQueue::new(2);
        let base = Instant::now();

        let a = queue.push("a", base);
        queue.push("b", base + Duration::from_secs(60));

        assert!(queue.is_any_expired(base + Duration::from_secs(1)));
        assert!(queue.remove(a));
        assert!(!queue.is_any_expired(base + Duration::from_secs(1)));
        assert_eq!(queue.len(), 1);
        queue.debug_validate_invariants();
    }
}
