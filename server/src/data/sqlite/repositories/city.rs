//! City and district repository for SQLite operations
//!
//! Read operations support optional caching. Pass `Some(cache)` to enable caching,
//! or `None` to bypass cache. Mutations automatically invalidate relevant cache keys.

use std::time::Duration;

use sqlx::SqlitePool;

use crate::core::constants::{CACHE_TTL_CITY_LIST, CACHE_TTL_DISTRICTS};
use crate::data::cache::{CacheKey, CacheService};
use crate::data::sqlite::SqliteError;
use crate::data::types::{City, District};

use super::listing::count_for_city;

/// Create a city
pub async fn create_city(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    name: &str,
    slug: &str,
) -> Result<City, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query("INSERT INTO cities (name, slug, created_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(slug)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| map_unique_violation(e, slug))?;

    if let Some(cache) = cache {
        cache.delete(&CacheKey::cities()).await;
    }

    let id = result.last_insert_rowid();
    tracing::debug!(city_id = id, %slug, "City created");
    Ok(City {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        created_at: now,
    })
}

fn map_unique_violation(e: sqlx::Error, slug: &str) -> SqliteError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            SqliteError::Conflict(format!("city slug '{}' already exists", slug))
        }
        _ => SqliteError::Database(e),
    }
}

/// List all cities ordered by name (with optional caching)
pub async fn list_cities(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
) -> Result<Vec<City>, SqliteError> {
    let Some(cache) = cache else {
        return list_cities_from_db(pool).await;
    };
    let key = CacheKey::cities();

    match cache.get::<Vec<City>>(&key).await {
        Ok(Some(cities)) => {
            tracing::trace!("City list cache hit");
            return Ok(cities);
        }
        Err(e) => tracing::warn!(error = %e, "Cache get error"),
        Ok(None) => {}
    }

    let cities = list_cities_from_db(pool).await?;

    if let Err(e) = cache
        .set(&key, &cities, Some(Duration::from_secs(CACHE_TTL_CITY_LIST)))
        .await
    {
        tracing::warn!(error = %e, "Cache set error");
    }

    Ok(cities)
}

async fn list_cities_from_db(pool: &SqlitePool) -> Result<Vec<City>, SqliteError> {
    let rows = sqlx::query_as::<_, (i64, String, String, i64)>(
        "SELECT id, name, slug, created_at FROM cities ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, slug, created_at)| City {
            id,
            name,
            slug,
            created_at,
        })
        .collect())
}

/// Get a city by ID
pub async fn get_city(pool: &SqlitePool, id: i64) -> Result<Option<City>, SqliteError> {
    let row = sqlx::query_as::<_, (i64, String, String, i64)>(
        "SELECT id, name, slug, created_at FROM cities WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(id, name, slug, created_at)| City {
        id,
        name,
        slug,
        created_at,
    }))
}

/// Rename a city and/or change its slug. Returns `None` if it does not exist.
pub async fn update_city(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    id: i64,
    name: &str,
    slug: &str,
) -> Result<Option<City>, SqliteError> {
    let result = sqlx::query("UPDATE cities SET name = ?, slug = ? WHERE id = ?")
        .bind(name)
        .bind(slug)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| map_unique_violation(e, slug))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    if let Some(cache) = cache {
        cache.delete(&CacheKey::cities()).await;
    }

    tracing::debug!(city_id = id, "City updated");
    get_city(pool, id).await
}

/// Delete a city and its districts.
///
/// Fails with `Conflict` while any listing (active or not) still references it.
pub async fn delete_city(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    id: i64,
) -> Result<bool, SqliteError> {
    let listings = count_for_city(pool, id).await?;
    if listings > 0 {
        return Err(SqliteError::Conflict(format!(
            "city {} still has {} listings",
            id, listings
        )));
    }

    let result = sqlx::query("DELETE FROM cities WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    let deleted = result.rows_affected() > 0;

    if deleted && let Some(cache) = cache {
        cache.delete(&CacheKey::cities()).await;
        cache.delete(&CacheKey::districts(id)).await;
    }

    if deleted {
        tracing::debug!(city_id = id, "City deleted");
    }
    Ok(deleted)
}

/// List districts of a city ordered by name (with optional caching).
///
/// Returns `None` when the city does not exist.
pub async fn list_districts(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    city_id: i64,
) -> Result<Option<Vec<District>>, SqliteError> {
    if let Some(cache) = cache {
        let key = CacheKey::districts(city_id);

        match cache.get::<Vec<District>>(&key).await {
            Ok(Some(districts)) => {
                tracing::trace!(city_id, "District list cache hit");
                return Ok(Some(districts));
            }
            Err(e) => tracing::warn!(city_id, error = %e, "Cache get error"),
            Ok(None) => {}
        }

        let result = list_districts_from_db(pool, city_id).await?;

        if let Some(ref districts) = result
            && let Err(e) = cache
                .set(
                    &key,
                    districts,
                    Some(Duration::from_secs(CACHE_TTL_DISTRICTS)),
                )
                .await
        {
            tracing::warn!(city_id, error = %e, "Cache set error");
        }

        Ok(result)
    } else {
        list_districts_from_db(pool, city_id).await
    }
}

async fn list_districts_from_db(
    pool: &SqlitePool,
    city_id: i64,
) -> Result<Option<Vec<District>>, SqliteError> {
    if get_city(pool, city_id).await?.is_none() {
        return Ok(None);
    }

    let rows = sqlx::query_as::<_, (i64, i64, String)>(
        "SELECT id, city_id, name FROM districts WHERE city_id = ? ORDER BY name, id",
    )
    .bind(city_id)
    .fetch_all(pool)
    .await?;

    Ok(Some(
        rows.into_iter()
            .map(|(id, city_id, name)| District { id, city_id, name })
            .collect(),
    ))
}

/// Replace the full district list of a city in one transaction.
///
/// Duplicate names are collapsed. Returns `None` when the city does not exist.
pub async fn replace_districts(
    pool: &SqlitePool,
    cache: Option<&CacheService>,
    city_id: i64,
    names: &[String],
) -> Result<Option<Vec<District>>, SqliteError> {
    if get_city(pool, city_id).await?.is_none() {
        return Ok(None);
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM districts WHERE city_id = ?")
        .bind(city_id)
        .execute(&mut *tx)
        .await?;
    for name in names {
        sqlx::query("INSERT OR IGNORE INTO districts (city_id, name) VALUES (?, ?)")
            .bind(city_id)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    if let Some(cache) = cache {
        cache.delete(&CacheKey::districts(city_id)).await;
    }

    tracing::debug!(city_id, count = names.len(), "Districts replaced");
    list_districts_from_db(pool, city_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CacheConfig;
    use crate::data::sqlite::repositories::create_listing;
    use crate::data::sqlite::test_pool;
    use crate::data::types::ListingFields;

    fn cache() -> CacheService {
        CacheService::new(&CacheConfig {
            max_entries: 100,
            ttl_secs: 60,
        })
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = test_pool().await;
        create_city(&pool, None, "Санкт-Петербург", "spb").await.unwrap();
        create_city(&pool, None, "Москва", "moscow").await.unwrap();

        let cities = list_cities(&pool, None).await.unwrap();
        let names: Vec<&str> = cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Москва", "Санкт-Петербург"]);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let pool = test_pool().await;
        create_city(&pool, None, "Москва", "moscow").await.unwrap();
        let err = create_city(&pool, None, "Moscow", "moscow")
            .await
            .unwrap_err();
        assert!(matches!(err, SqliteError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_city_list_cache_is_invalidated_on_write() {
        let pool = test_pool().await;
        let cache = cache();
        create_city(&pool, Some(&cache), "Москва", "moscow").await.unwrap();

        assert_eq!(list_cities(&pool, Some(&cache)).await.unwrap().len(), 1);
        assert!(cache.exists(&CacheKey::cities()));

        let kazan = create_city(&pool, Some(&cache), "Казань", "kazan").await.unwrap();
        assert!(!cache.exists(&CacheKey::cities()));
        assert_eq!(list_cities(&pool, Some(&cache)).await.unwrap().len(), 2);

        update_city(&pool, Some(&cache), kazan.id, "Казань", "kzn")
            .await
            .unwrap()
            .unwrap();
        let cities = list_cities(&pool, Some(&cache)).await.unwrap();
        assert!(cities.iter().any(|c| c.slug == "kzn"));
    }

    #[tokio::test]
    async fn test_update_missing_city() {
        let pool = test_pool().await;
        assert!(update_city(&pool, None, 5, "X", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_city_with_listings_is_conflict() {
        let pool = test_pool().await;
        let city = create_city(&pool, None, "Москва", "moscow").await.unwrap();
        create_listing(
            &pool,
            &ListingFields {
                name: "A".into(),
                age: 25,
                phone: "+7".into(),
                price_1_hour: 3000,
                city_id: city.id,
                gender: "female".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = delete_city(&pool, None, city.id).await.unwrap_err();
        assert!(matches!(err, SqliteError::Conflict(_)));
        assert!(get_city(&pool, city.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_city_removes_districts() {
        let pool = test_pool().await;
        let city = create_city(&pool, None, "Москва", "moscow").await.unwrap();
        replace_districts(&pool, None, city.id, &["Центр".to_string()])
            .await
            .unwrap();

        assert!(delete_city(&pool, None, city.id).await.unwrap());
        assert!(!delete_city(&pool, None, city.id).await.unwrap());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM districts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_replace_and_list_districts() {
        let pool = test_pool().await;
        let cache = cache();
        let city = create_city(&pool, None, "Москва", "moscow").await.unwrap();

        let first = vec!["Центр".to_string(), "Арбат".to_string(), "Центр".to_string()];
        let districts = replace_districts(&pool, Some(&cache), city.id, &first)
            .await
            .unwrap()
            .unwrap();
        let names: Vec<&str> = districts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Арбат", "Центр"]);

        // Populate cache, then replace and observe the new list
        list_districts(&pool, Some(&cache), city.id).await.unwrap();
        replace_districts(&pool, Some(&cache), city.id, &["Тверской".to_string()])
            .await
            .unwrap();
        let listed = list_districts(&pool, Some(&cache), city.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Тверской");
    }

    #[tokio::test]
    async fn test_districts_of_unknown_city() {
        let pool = test_pool().await;
        assert!(list_districts(&pool, None, 9).await.unwrap().is_none());
        assert!(
            replace_districts(&pool, None, 9, &["A".to_string()])
                .await
                .unwrap()
                .is_none()
        );
    }
}
