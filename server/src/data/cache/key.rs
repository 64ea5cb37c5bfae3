//! Type-safe cache key builder with versioning

use crate::core::constants::CACHE_KEY_VERSION;

/// Type-safe cache key builder
///
/// All keys are prefixed with a version (e.g., "v1:") to allow
/// invalidating all cached data on schema changes.
pub struct CacheKey;

impl CacheKey {
    /// Cache key for the full city list
    pub fn cities() -> String {
        format!("{}:cities", CACHE_KEY_VERSION)
    }

    /// Cache key for the district list of a city
    pub fn districts(city_id: i64) -> String {
        format!("{}:districts:city:{}", CACHE_KEY_VERSION, city_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_versioned() {
        assert!(CacheKey::cities().starts_with(CACHE_KEY_VERSION));
        assert!(CacheKey::districts(3).starts_with(CACHE_KEY_VERSION));
    }

    #[test]
    fn test_keys_are_distinct() {
        assert_ne!(CacheKey::cities(), CacheKey::districts(1));
        assert_ne!(CacheKey::districts(1), CacheKey::districts(10));
        assert_eq!(CacheKey::districts(7), format!("{}:districts:city:7", CACHE_KEY_VERSION));
    }
}
