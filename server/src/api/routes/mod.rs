//! API route handlers

pub mod auth;
pub mod cities;
pub mod health;
pub mod profiles;
pub mod services;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::response::Response;
    use serde_json::Value;

    use crate::core::config::CacheConfig;
    use crate::data::cache::CacheService;
    use crate::data::sqlite::test_pool;
    use crate::data::{DirectoryRepository, SqliteService};

    pub async fn repository() -> Arc<dyn DirectoryRepository> {
        Arc::new(Arc::new(SqliteService::from_pool(test_pool().await)))
    }

    pub fn cache() -> Arc<CacheService> {
        Arc::new(CacheService::new(&CacheConfig {
            max_entries: 100,
            ttl_secs: 60,
        }))
    }

    pub async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
