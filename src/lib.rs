//! TTL LRU Cache - a fixed-capacity in-process key/value cache
//!
//! Bounds memory by entry count and staleness by a single cache-wide TTL.
//! When a new key would overflow the cache, an expired entry is reclaimed if
//! there is one, otherwise the least recently used entry is evicted.

pub mod cache;
pub mod config;
pub mod error;
pub mod shared;

pub use cache::{CacheStats, Clock, ManualClock, SystemClock, TtlLruCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use shared::SharedCache;
