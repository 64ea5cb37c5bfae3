//! Cache module
//!
//! In-memory cache for read-mostly reference data (cities, districts).
//! Backed by moka with per-entry TTLs; values are stored as JSON bytes.

mod error;
mod key;

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::CacheError;
pub use key::CacheKey;

use crate::core::config::CacheConfig;

/// Cache entry with data and its time to live
#[derive(Clone)]
struct CacheEntry {
    data: Vec<u8>,
    ttl: Duration,
}

/// Per-entry expiry tracking for variable TTLs
struct VariableTtlExpiry;

impl Expiry<String, CacheEntry> for VariableTtlExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Cache service providing typed access to the in-memory store
pub struct CacheService {
    cache: Cache<String, CacheEntry>,
    default_ttl: Duration,
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("entries", &self.cache.entry_count())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl CacheService {
    pub fn new(config: &CacheConfig) -> Self {
        tracing::debug!(
            max_entries = config.max_entries,
            ttl_secs = config.ttl_secs,
            "Initializing in-memory cache"
        );
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .initial_capacity((config.max_entries as usize / 4).min(1_000))
            .expire_after(VariableTtlExpiry)
            .build();

        Self {
            cache,
            default_ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    /// Get a typed value from cache
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.cache.get(key).await {
            Some(entry) => Ok(Some(serde_json::from_slice(&entry.data)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value in cache; `None` uses the configured TTL
    pub async fn set<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry {
            data: serde_json::to_vec(value)?,
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    /// Delete a key from cache
    pub async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
        tracing::trace!(key = %key, "Cache key invalidated");
    }

    #[cfg(test)]
    pub fn exists(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }
}
