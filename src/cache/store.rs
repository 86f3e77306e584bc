//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with a recency queue for LRU
//! eviction and an expiry queue for TTL reclamation.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::cache::{CacheEntry, CacheStats, Clock, ExpiryQueue, RecencyQueue, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

/// Longest TTL honoured; longer values are clamped so expiration instants
/// stay representable.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == TTL LRU Cache ==
/// Fixed-capacity cache with LRU and TTL eviction.
///
/// Every live key has exactly one node in the recency queue and one in the
/// expiry queue, and its entry records both slot indices. When a `set` would
/// push the cache past capacity, one entry is reclaimed: the soonest-expiring
/// one if it has already expired, otherwise the least recently used one.
///
/// Expiry is enforced lazily. Reads never fail because an entry is stale;
/// stale entries are reclaimed by an overflowing `set` or by
/// [`TtlLruCache::purge_expired`].
#[derive(Debug)]
pub struct TtlLruCache<K, V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Keys ordered by last access
    recency: RecencyQueue<K>,
    /// Keys ordered by expiration instant
    expiry: ExpiryQueue<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied to every entry
    ttl: Duration,
    clock: C,
}

impl<K, V> TtlLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new cache with specified capacity and TTL.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `ttl` - Time to live applied to every entry
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        Self::with_clock(capacity, ttl, SystemClock)
    }

    /// Creates a new cache from a [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity, config.ttl)
    }
}

impl<K, V, C> TtlLruCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    /// Creates a new cache that reads time from `clock`.
    pub fn with_clock(capacity: usize, ttl: Duration, clock: C) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            recency: RecencyQueue::new(capacity),
            expiry: ExpiryQueue::new(capacity),
            stats: CacheStats::new(),
            capacity,
            ttl: ttl.min(MAX_TTL),
            clock,
        })
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// Setting a key that is already present replaces its entry: the old
    /// queue nodes are unlinked first, so the entry becomes the most recently
    /// used and gets a fresh expiration instant. Setting a new key into a full
    /// cache evicts exactly one entry. Statistics are not touched.
    pub fn set(&mut self, key: K, value: V) {
        let now = self.clock.now();
        let expires_at = now + self.ttl;

        if let Some(old) = self.entries.remove(&key) {
            self.unlink(&old);
        } else if self.entries.len() >= self.capacity {
            self.evict_one(now);
        }
        debug_assert!(self.entries.len() < self.capacity);

        let expiry_idx = self.expiry.push(key.clone(), expires_at);
        let recency_idx = self.recency.touch(key.clone(), now);
        self.entries.insert(
            key,
            CacheEntry::new(value, expires_at, recency_idx, expiry_idx),
        );
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit moves the key to the most recently used position. The entry's
    /// expiration instant is not consulted.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        entry.recency_idx = self.recency.refresh(entry.recency_idx, now);
        Some(&entry.value)
    }

    // == Delete ==
    /// Removes an entry by key.
    ///
    /// Returns whether the key was present; deleting an absent key is a no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.remove(key) {
            Some(entry) => {
                self.unlink(&entry);
                true
            }
            None => false,
        }
    }

    // == Reset ==
    /// Drops every entry, rebuilds both queues and zeroes the statistics.
    pub fn reset(&mut self) {
        let dropped = self.entries.len();
        self.entries = HashMap::with_capacity(self.capacity);
        self.recency = RecencyQueue::new(self.capacity);
        self.expiry = ExpiryQueue::new(self.capacity);
        self.stats = CacheStats::new();
        info!(dropped, capacity = self.capacity, "cache reset");
    }

    // == Purge Expired ==
    /// Removes every entry whose TTL has elapsed.
    ///
    /// Returns the number of entries removed. Only expired entries are
    /// visited, so the cost is proportional to the number purged.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let mut purged = 0;

        while self.expiry.is_any_expired(now) {
            let Some(node) = self.expiry.pop() else {
                break;
            };
            let entry = self.take_entry(&node.value);
            debug_assert!(entry.is_expired(now));
            self.unlink_recency(&entry);
            purged += 1;
        }

        if purged > 0 {
            info!(purged, remaining = self.entries.len(), "purged expired entries");
        }
        purged
    }

    // == Stats ==
    /// Returns a snapshot of the hit, miss and eviction counters.
    pub fn stat(&self) -> CacheStats {
        self.stats
    }

    /// Returns true if `key` is present, without touching recency or stats.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Returns how long `key` has left before it becomes eligible for
    /// reclamation, without touching recency or stats.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.entries.get(key).map(|entry| entry.ttl_remaining(now))
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Eviction ==
    /// Reclaims one entry, preferring an expired one over the LRU one.
    fn evict_one(&mut self, now: Instant) {
        if self.expiry.is_any_expired(now) {
            let Some(node) = self.expiry.pop() else {
                panic!("expiry queue reported an expired head but popped nothing");
            };
            let entry = self.take_entry(&node.value);
            self.unlink_recency(&entry);
            debug!(
                path = "expired",
                overdue_ms = now.saturating_duration_since(entry.expires_at).as_millis() as u64,
                "evicted entry"
            );
        } else {
            let Some(key) = self.recency.evict_oldest() else {
                panic!(
                    "cache holds {} entries but its recency queue is empty",
                    self.entries.len()
                );
            };
            let entry = self.take_entry(&key);
            self.unlink_expiry(&entry);
            debug!(path = "lru", "evicted entry");
        }
        self.stats.record_eviction();
    }

    /// Removes the entry for a key that a queue just yielded.
    fn take_entry(&mut self, key: &K) -> CacheEntry<V> {
        match self.entries.remove(key) {
            Some(entry) => entry,
            None => panic!("queue yielded a key with no cache entry"),
        }
    }

    fn unlink(&mut self, entry: &CacheEntry<V>) {
        self.unlink_recency(entry);
        self.unlink_expiry(entry);
    }

    fn unlink_recency(&mut self, entry: &CacheEntry<V>) {
        assert!(
            self.recency.remove(entry.recency_idx),
            "entry points at free recency slot {}",
            entry.recency_idx
        );
    }

    fn unlink_expiry(&mut self, entry: &CacheEntry<V>) {
        assert!(
            self.expiry.remove(entry.expiry_idx),
            "entry points at free expiry slot {}",
            entry.expiry_idx
        );
    }

    /// Checks that the store and both queues describe the same set of keys.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.recency.debug_validate_invariants();
        self.expiry.debug_validate_invariants();

        assert!(self.entries.len() <= self.capacity);
        assert_eq!(self.recency.len(), self.entries.len());
        assert_eq!(self.expiry.len(), self.entries.len());

        for (key, entry) in &self.entries {
            let recency = self.recency.get(entry.recency_idx);
            assert!(recency.map_or(false, |node| &node.value == key));

            let expiry = self.expiry.get(entry.expiry_idx);
            assert!(expiry.map_or(false, |node| &node.value == key));
            assert_eq!(expiry.map(|node| node.timestamp), Some(entry.expires_at));
        }
    }
}
