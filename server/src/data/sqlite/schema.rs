//! SQLite schema definitions

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Cities (must be before districts and listings due to FK)
-- =============================================================================
CREATE TABLE IF NOT EXISTS cities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK(length(name) >= 1 AND length(name) <= 100),
    slug TEXT NOT NULL UNIQUE CHECK(
        (length(slug) >= 2 AND length(slug) <= 50 AND slug GLOB '[a-z0-9][a-z0-9-]*[a-z0-9]')
        OR (length(slug) = 1 AND slug GLOB '[a-z0-9]')
    ),
    created_at INTEGER NOT NULL
);

-- =============================================================================
-- 2. Districts (owned by a city)
-- =============================================================================
CREATE TABLE IF NOT EXISTS districts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    city_id INTEGER NOT NULL REFERENCES cities(id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK(length(name) >= 1 AND length(name) <= 100),
    UNIQUE (city_id, name)
);

CREATE INDEX IF NOT EXISTS idx_districts_city ON districts(city_id);

-- =============================================================================
-- 3. Listings
-- =============================================================================
-- services/photos: JSON arrays of strings stored as TEXT
-- prices: whole currency units
-- timestamps: unix seconds
CREATE TABLE IF NOT EXISTS listings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL CHECK(length(name) >= 1 AND length(name) <= 100),
    age INTEGER NOT NULL CHECK(age >= 18),
    height INTEGER,
    weight INTEGER,
    breast_size INTEGER,
    phone TEXT NOT NULL,
    description TEXT,
    price_1_hour INTEGER NOT NULL CHECK(price_1_hour >= 0),
    price_2_hours INTEGER CHECK(price_2_hours IS NULL OR price_2_hours >= 0),
    price_night INTEGER CHECK(price_night IS NULL OR price_night >= 0),
    price_express INTEGER CHECK(price_express IS NULL OR price_express >= 0),
    city_id INTEGER NOT NULL REFERENCES cities(id) ON DELETE RESTRICT,
    district TEXT,
    gender TEXT NOT NULL,
    nationality TEXT,
    hair_color TEXT,
    bikini_zone TEXT,
    services TEXT NOT NULL DEFAULT '[]',
    photos TEXT NOT NULL DEFAULT '[]',
    is_active INTEGER NOT NULL DEFAULT 1,
    is_verified INTEGER NOT NULL DEFAULT 0,
    has_verified_photos INTEGER NOT NULL DEFAULT 0,
    has_video INTEGER NOT NULL DEFAULT 0,
    has_reviews INTEGER NOT NULL DEFAULT 0,
    is_new INTEGER NOT NULL DEFAULT 0,
    is_waiting_call INTEGER NOT NULL DEFAULT 0,
    is_24_hours INTEGER NOT NULL DEFAULT 0,
    is_non_smoking INTEGER NOT NULL DEFAULT 0,
    in_call INTEGER NOT NULL DEFAULT 1,
    out_call INTEGER NOT NULL DEFAULT 0,
    is_alone INTEGER NOT NULL DEFAULT 0,
    with_friend INTEGER NOT NULL DEFAULT 0,
    with_friends INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_listings_public ON listings(is_active, city_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_listings_price ON listings(price_1_hour);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_check_matches_max_len() {
        let bound = format!("length(slug) <= {}", crate::core::constants::MAX_SLUG_LEN);
        assert!(SCHEMA.contains(&bound));
    }

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn test_schema_version_is_positive() {
        assert!(SCHEMA_VERSION > 0);
    }

    #[test]
    fn test_schema_contains_required_tables() {
        let required_tables = [
            "schema_version",
            "schema_migrations",
            "cities",
            "districts",
            "listings",
        ];

        for table in required_tables {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table)),
                "Schema missing table: {}",
                table
            );
        }
    }

    #[tokio::test]
    async fn test_schema_applies_to_fresh_database() {
        let pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(SCHEMA).execute(&pool).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('cities','districts','listings')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 3);
    }

    #[tokio::test]
    async fn test_json_columns_default_to_empty_array() {
        let pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(SCHEMA).execute(&pool).await.unwrap();
        sqlx::query("INSERT INTO cities (name, slug, created_at) VALUES ('Москва', 'moscow', 0)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO listings (name, age, phone, price_1_hour, city_id, gender, created_at, updated_at)
             VALUES ('A', 25, '+70000000000', 3000, 1, 'female', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let (services, photos): (String, String) =
            sqlx::query_as("SELECT services, photos FROM listings WHERE id = 1")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(services, "[]");
        assert_eq!(photos, "[]");
    }
}
