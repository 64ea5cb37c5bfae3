//! Repository traits for the listing store
//!
//! API handlers depend on these traits rather than on `SqliteService`, so the
//! backend can be swapped or stubbed in tests.

use async_trait::async_trait;

use crate::data::cache::CacheService;
use crate::data::error::DataError;
use crate::data::types::{City, District, Listing, ListingFields};
use crate::domain::filters::ListingQuery;

/// Repository trait for listings and their reference data (cities, districts)
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    // ==================== Listing Operations ====================

    /// Public search: active listings matching the query
    async fn search_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, DataError>;

    /// Get a listing by ID, active or not
    async fn get_listing(&self, id: i64) -> Result<Option<Listing>, DataError>;

    /// Admin listing of every listing, newest first, with total count
    async fn list_listings(&self, page: u32, limit: u32) -> Result<(Vec<Listing>, u64), DataError>;

    async fn create_listing(&self, fields: &ListingFields) -> Result<Listing, DataError>;

    /// Full replacement of editable fields; `None` if the listing does not exist
    async fn update_listing(
        &self,
        id: i64,
        fields: &ListingFields,
    ) -> Result<Option<Listing>, DataError>;

    async fn delete_listing(&self, id: i64) -> Result<bool, DataError>;

    async fn toggle_verified(&self, id: i64) -> Result<Option<Listing>, DataError>;

    async fn toggle_active(&self, id: i64) -> Result<Option<Listing>, DataError>;

    // ==================== City Operations ====================

    async fn list_cities(&self, cache: Option<&CacheService>) -> Result<Vec<City>, DataError>;

    async fn create_city(
        &self,
        cache: Option<&CacheService>,
        name: &str,
        slug: &str,
    ) -> Result<City, DataError>;

    async fn update_city(
        &self,
        cache: Option<&CacheService>,
        id: i64,
        name: &str,
        slug: &str,
    ) -> Result<Option<City>, DataError>;

    /// Fails with `Conflict` while listings still reference the city
    async fn delete_city(&self, cache: Option<&CacheService>, id: i64) -> Result<bool, DataError>;

    // ==================== District Operations ====================

    /// `None` when the city does not exist
    async fn list_districts(
        &self,
        cache: Option<&CacheService>,
        city_id: i64,
    ) -> Result<Option<Vec<District>>, DataError>;

    /// Replace the district list; `None` when the city does not exist
    async fn replace_districts(
        &self,
        cache: Option<&CacheService>,
        city_id: i64,
        names: &[String],
    ) -> Result<Option<Vec<District>>, DataError>;
}
