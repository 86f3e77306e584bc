//! Configuration Module
//!
//! Handles loading and validating cache construction parameters.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Environment variable holding the maximum number of entries.
pub const CAPACITY_ENV: &str = "CACHE_CAPACITY";

/// Environment variable holding the cache-wide TTL in milliseconds.
pub const TTL_MS_ENV: &str = "CACHE_TTL_MS";

const DEFAULT_CAPACITY: usize = 1000;
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache construction parameters.
///
/// Both values are fixed for the lifetime of a cache built from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Time to live applied to every entry, serialized as milliseconds
    #[serde(rename = "ttl_ms", with = "duration_millis")]
    pub ttl: Duration,
}

impl CacheConfig {
    /// Creates a config with the given capacity and TTL.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { capacity, ttl }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL_MS` - TTL in milliseconds (default: 300000)
    ///
    /// Missing variables fall back to their defaults; variables that are set
    /// but cannot be parsed are reported as [`CacheError::InvalidConfig`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`CacheConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let capacity = parse_var(&lookup, CAPACITY_ENV)?.unwrap_or(DEFAULT_CAPACITY);
        let ttl = parse_var::<u64, _>(&lookup, TTL_MS_ENV)?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TTL);

        let config = Self { capacity, ttl };
        config.validate()?;
        Ok(config)
    }

    // == Validate ==
    /// Rejects configurations a cache cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: DEFAULT_TTL,
        }
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            CacheError::InvalidConfig(format!("{} has unparseable value '{}'", name, raw))
        }),
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
