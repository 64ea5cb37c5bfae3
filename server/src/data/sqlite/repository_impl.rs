//! DirectoryRepository and ListingSource implementations for SQLite

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::cache::CacheService;
use crate::data::error::DataError;
use crate::data::traits::DirectoryRepository;
use crate::data::types::{City, District, Listing, ListingFields};
use crate::domain::filters::ListingQuery;
use crate::domain::search::ListingSource;

use super::SqliteService;
use super::repositories::{city, listing};

#[async_trait]
impl DirectoryRepository for Arc<SqliteService> {
    // ==================== Listing Operations ====================

    async fn search_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, DataError> {
        listing::search_listings(self.pool(), query)
            .await
            .map_err(Into::into)
    }

    async fn get_listing(&self, id: i64) -> Result<Option<Listing>, DataError> {
        listing::get_listing(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn list_listings(&self, page: u32, limit: u32) -> Result<(Vec<Listing>, u64), DataError> {
        listing::list_listings(self.pool(), page, limit)
            .await
            .map_err(Into::into)
    }

    async fn create_listing(&self, fields: &ListingFields) -> Result<Listing, DataError> {
        listing::create_listing(self.pool(), fields)
            .await
            .map_err(Into::into)
    }

    async fn update_listing(
        &self,
        id: i64,
        fields: &ListingFields,
    ) -> Result<Option<Listing>, DataError> {
        listing::update_listing(self.pool(), id, fields)
            .await
            .map_err(Into::into)
    }

    async fn delete_listing(&self, id: i64) -> Result<bool, DataError> {
        listing::delete_listing(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn toggle_verified(&self, id: i64) -> Result<Option<Listing>, DataError> {
        listing::toggle_verified(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    async fn toggle_active(&self, id: i64) -> Result<Option<Listing>, DataError> {
        listing::toggle_active(self.pool(), id)
            .await
            .map_err(Into::into)
    }

    // ==================== City Operations ====================

    async fn list_cities(&self, cache: Option<&CacheService>) -> Result<Vec<City>, DataError> {
        city::list_cities(self.pool(), cache)
            .await
            .map_err(Into::into)
    }

    async fn create_city(
        &self,
        cache: Option<&CacheService>,
        name: &str,
        slug: &str,
    ) -> Result<City, DataError> {
        city::create_city(self.pool(), cache, name, slug)
            .await
            .map_err(Into::into)
    }

    async fn update_city(
        &self,
        cache: Option<&CacheService>,
        id: i64,
        name: &str,
        slug: &str,
    ) -> Result<Option<City>, DataError> {
        city::update_city(self.pool(), cache, id, name, slug)
            .await
            .map_err(Into::into)
    }

    async fn delete_city(&self, cache: Option<&CacheService>, id: i64) -> Result<bool, DataError> {
        city::delete_city(self.pool(), cache, id)
            .await
            .map_err(Into::into)
    }

    // ==================== District Operations ====================

    async fn list_districts(
        &self,
        cache: Option<&CacheService>,
        city_id: i64,
    ) -> Result<Option<Vec<District>>, DataError> {
        city::list_districts(self.pool(), cache, city_id)
            .await
            .map_err(Into::into)
    }

    async fn replace_districts(
        &self,
        cache: Option<&CacheService>,
        city_id: i64,
        names: &[String],
    ) -> Result<Option<Vec<District>>, DataError> {
        city::replace_districts(self.pool(), cache, city_id, names)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl ListingSource for Arc<SqliteService> {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Listing>, DataError> {
        DirectoryRepository::search_listings(self, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::test_pool;
    use crate::domain::filters::{FilterGroup, GroupChange};
    use crate::domain::search::{SearchSession, SearchStatus};

    #[tokio::test]
    async fn test_search_session_over_sqlite() {
        let db = Arc::new(SqliteService::from_pool(test_pool().await));
        let city = db.create_city(None, "Москва", "moscow").await.unwrap();
        for (name, district, out_call) in [("A", "Центр", true), ("B", "Арбат", false)] {
            db.create_listing(&ListingFields {
                name: name.into(),
                age: 25,
                phone: "+7".into(),
                price_1_hour: 3000,
                city_id: city.id,
                district: Some(district.into()),
                gender: "female".into(),
                out_call,
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let source: Arc<dyn ListingSource> = Arc::new(db.clone());
        let session = SearchSession::new(source, Some(city.id));

        session.refresh().await.unwrap();
        assert_eq!(session.results().listings.len(), 2);

        let mut draft = session.draft(FilterGroup::District);
        draft.toggle("Центр").unwrap();
        session.commit(draft).unwrap().await.unwrap();
        let results = session.results();
        assert_eq!(results.status, SearchStatus::Ready);
        assert_eq!(results.listings.len(), 1);
        assert_eq!(results.listings[0].name, "A");

        session.apply_group(GroupChange::Outcall(true)).await.unwrap();
        assert_eq!(session.results().listings.len(), 1);

        session.reset().await.unwrap();
        assert_eq!(session.results().listings.len(), 2);
    }
}
