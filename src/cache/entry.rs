//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value plus its back-references into both queues.
///
/// `recency_idx` and `expiry_idx` are slot indices, not ownership: they must
/// always name the slot currently holding this entry's key in the recency
/// queue and the expiry queue respectively.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Instant after which the entry is eligible for reclamation
    pub expires_at: Instant,
    /// Slot of this entry's key in the recency queue
    pub recency_idx: usize,
    /// Slot of this entry's key in the expiry queue
    pub expiry_idx: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    pub fn new(value: V, expires_at: Instant, recency_idx: usize, expiry_idx: usize) -> Self {
        Self {
            value,
            expires_at,
            recency_idx,
            expiry_idx,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: the entry is expired only once `now` is strictly
    /// after `expires_at`, matching the expiry queue's check.
    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }

    // == Time To Live ==
    /// Returns the time left before expiry, saturating at zero.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_not_expired_before_deadline() {
        let now = Instant::now();
        let entry = CacheEntry::new("value", now + Duration::from_secs(10), 0, 0);

        assert!(!entry.is_expired(now));
        assert_eq!(entry.ttl_remaining(now), Duration::from_secs(10));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new("value", now, 0, 0);

        // Live at the exact instant, expired just after
        assert!(!entry.is_expired(now));
        assert!(entry.is_expired(now + Duration::from_nanos(1)));
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let now = Instant::now();
        let entry = CacheEntry::new("value", now, 3, 7);

        assert_eq!(entry.ttl_remaining(now + Duration::from_secs(5)), Duration::ZERO);
        assert_eq!(entry.recency_idx, 3);
        assert_eq!(entry.expiry_idx, 7);
    }
}
