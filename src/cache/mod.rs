//! Cache Module
//!
//! Provides a fixed-capacity cache with LRU eviction and TTL reclamation,
//! built on two slab-backed queues.

mod clock;
mod entry;
mod expiry;
mod lru;
mod queue;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use expiry::ExpiryQueue;
pub use lru::RecencyQueue;
pub use queue::{Iter, Node, SlabQueue};
pub use stats::CacheStats;
pub use store::{TtlLruCache, MAX_TTL};
