//! Shared Cache Module
//!
//! Thread-safe handle around a [`TtlLruCache`].

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, Clock, SystemClock, TtlLruCache};
use crate::config::CacheConfig;
use crate::error::Result;

/// Cloneable, thread-safe cache handle.
///
/// All clones share one cache behind a single read/write lock. Every
/// operation that can reorder or change the queues takes the write lock,
/// including `get`, which advances recency. Only the aggregate observers
/// (`len`, `is_empty`, `stat`, `contains_key`) share the read lock.
#[derive(Debug)]
pub struct SharedCache<K, V, C = SystemClock> {
    inner: Arc<RwLock<TtlLruCache<K, V, C>>>,
}

impl<K, V, C> Clone for SharedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates a shared cache with the given capacity and TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        TtlLruCache::new(capacity, ttl).map(Self::from_store)
    }

    /// Creates a shared cache from a [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        TtlLruCache::from_config(config).map(Self::from_store)
    }
}

impl<K, V, C> SharedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    /// Wraps an existing cache.
    pub fn from_store(store: TtlLruCache<K, V, C>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn set(&self, key: K, value: V) {
        self.inner.write().await.set(key, value);
    }

    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Takes the write lock because a hit advances the key's recency.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.write().await.get(key).cloned()
    }

    pub async fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.write().await.delete(key)
    }

    pub async fn reset(&self) {
        self.inner.write().await.reset();
    }

    pub async fn purge_expired(&self) -> usize {
        self.inner.write().await.purge_expired()
    }

    pub async fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn stat(&self) -> CacheStats {
        self.inner.read().await.stat()
    }
}
