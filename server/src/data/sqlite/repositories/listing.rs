//! Listing repository for SQLite operations
//!
//! Listings are not cached: the public search varies per request and admin
//! writes must be visible immediately.

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::sqlite::filters::{SqlParams, SqlValue, build_public_where, order_by_sql};
use crate::data::types::{Listing, ListingFields, ListingRow};
use crate::domain::filters::ListingQuery;
use crate::utils::json::encode_string_array;

const LISTING_COLUMNS: &str = "id, name, age, height, weight, breast_size, phone, description, \
     price_1_hour, price_2_hours, price_night, price_express, city_id, district, gender, \
     nationality, hair_color, bikini_zone, services, photos, is_active, is_verified, \
     has_verified_photos, has_video, has_reviews, is_new, is_waiting_call, is_24_hours, \
     is_non_smoking, in_call, out_call, is_alone, with_friend, with_friends, created_at, updated_at";

/// Run a public search: active listings only, filtered, ordered and paged
pub async fn search_listings(
    pool: &SqlitePool,
    query: &ListingQuery,
) -> Result<Vec<Listing>, SqliteError> {
    let mut params = SqlParams::default();
    let where_clause = build_public_where(query, &mut params);
    let sql = format!(
        "SELECT {} FROM listings WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
        LISTING_COLUMNS,
        where_clause,
        order_by_sql(query.order)
    );

    let mut q = sqlx::query_as::<_, ListingRow>(&sql);
    for value in params.values {
        q = match value {
            SqlValue::Int(v) => q.bind(v),
            SqlValue::Text(v) => q.bind(v),
        };
    }
    let rows = q
        .bind(query.page.limit)
        .bind(query.page.offset)
        .fetch_all(pool)
        .await?;

    tracing::trace!(
        criteria = query.criteria.len(),
        results = rows.len(),
        "Listing search"
    );
    Ok(rows.into_iter().map(Listing::from).collect())
}

/// Get a listing by ID regardless of its active state
pub async fn get_listing(pool: &SqlitePool, id: i64) -> Result<Option<Listing>, SqliteError> {
    let sql = format!("SELECT {} FROM listings WHERE id = ?", LISTING_COLUMNS);
    let row = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Listing::from))
}

/// List all listings (including inactive) with pagination, newest first
pub async fn list_listings(
    pool: &SqlitePool,
    page: u32,
    limit: u32,
) -> Result<(Vec<Listing>, u64), SqliteError> {
    let offset = (page.saturating_sub(1)) * limit;

    let sql = format!(
        "SELECT {} FROM listings ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        LISTING_COLUMNS
    );
    let rows = sqlx::query_as::<_, ListingRow>(&sql)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM listings")
        .fetch_one(pool)
        .await?;

    Ok((
        rows.into_iter().map(Listing::from).collect(),
        total.0 as u64,
    ))
}

/// Number of listings (active or not) in a city
pub async fn count_for_city(pool: &SqlitePool, city_id: i64) -> Result<i64, SqliteError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE city_id = ?")
        .bind(city_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

async fn ensure_city_exists(pool: &SqlitePool, city_id: i64) -> Result<(), SqliteError> {
    let exists: bool = sqlx::query_scalar("SELECT COUNT(*) > 0 FROM cities WHERE id = ?")
        .bind(city_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(SqliteError::NotFound(format!("city {}", city_id)));
    }
    Ok(())
}

/// Create a listing. New listings are active and unverified.
pub async fn create_listing(
    pool: &SqlitePool,
    fields: &ListingFields,
) -> Result<Listing, SqliteError> {
    ensure_city_exists(pool, fields.city_id).await?;
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO listings (name, age, height, weight, breast_size, phone, description, \
         price_1_hour, price_2_hours, price_night, price_express, city_id, district, gender, \
         nationality, hair_color, bikini_zone, services, photos, is_active, is_verified, \
         has_verified_photos, has_video, has_reviews, is_new, is_waiting_call, is_24_hours, \
         is_non_smoking, in_call, out_call, is_alone, with_friend, with_friends, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 0, \
         ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&fields.name)
    .bind(fields.age)
    .bind(fields.height)
    .bind(fields.weight)
    .bind(fields.breast_size)
    .bind(&fields.phone)
    .bind(&fields.description)
    .bind(fields.price_1_hour)
    .bind(fields.price_2_hours)
    .bind(fields.price_night)
    .bind(fields.price_express)
    .bind(fields.city_id)
    .bind(&fields.district)
    .bind(&fields.gender)
    .bind(&fields.nationality)
    .bind(&fields.hair_color)
    .bind(&fields.bikini_zone)
    .bind(encode_string_array(&fields.services))
    .bind(encode_string_array(&fields.photos))
    .bind(fields.has_verified_photos)
    .bind(fields.has_video)
    .bind(fields.has_reviews)
    .bind(fields.is_new)
    .bind(fields.is_waiting_call)
    .bind(fields.is_24_hours)
    .bind(fields.is_non_smoking)
    .bind(fields.in_call)
    .bind(fields.out_call)
    .bind(fields.is_alone)
    .bind(fields.with_friend)
    .bind(fields.with_friends)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    tracing::debug!(listing_id = id, city_id = fields.city_id, "Listing created");

    get_listing(pool, id)
        .await?
        .ok_or_else(|| SqliteError::NotFound(format!("listing {}", id)))
}

/// Replace every editable field. Returns `None` if the listing does not exist.
pub async fn update_listing(
    pool: &SqlitePool,
    id: i64,
    fields: &ListingFields,
) -> Result<Option<Listing>, SqliteError> {
    ensure_city_exists(pool, fields.city_id).await?;
    let now = chrono::Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE listings SET name = ?, age = ?, height = ?, weight = ?, breast_size = ?, \
         phone = ?, description = ?, price_1_hour = ?, price_2_hours = ?, price_night = ?, \
         price_express = ?, city_id = ?, district = ?, gender = ?, nationality = ?, \
         hair_color = ?, bikini_zone = ?, services = ?, photos = ?, has_verified_photos = ?, \
         has_video = ?, has_reviews = ?, is_new = ?, is_waiting_call = ?, is_24_hours = ?, \
         is_non_smoking = ?, in_call = ?, out_call = ?, is_alone = ?, with_friend = ?, \
         with_friends = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&fields.name)
    .bind(fields.age)
    .bind(fields.height)
    .bind(fields.weight)
    .bind(fields.breast_size)
    .bind(&fields.phone)
    .bind(&fields.description)
    .bind(fields.price_1_hour)
    .bind(fields.price_2_hours)
    .bind(fields.price_night)
    .bind(fields.price_express)
    .bind(fields.city_id)
    .bind(&fields.district)
    .bind(&fields.gender)
    .bind(&fields.nationality)
    .bind(&fields.hair_color)
    .bind(&fields.bikini_zone)
    .bind(encode_string_array(&fields.services))
    .bind(encode_string_array(&fields.photos))
    .bind(fields.has_verified_photos)
    .bind(fields.has_video)
    .bind(fields.has_reviews)
    .bind(fields.is_new)
    .bind(fields.is_waiting_call)
    .bind(fields.is_24_hours)
    .bind(fields.is_non_smoking)
    .bind(fields.in_call)
    .bind(fields.out_call)
    .bind(fields.is_alone)
    .bind(fields.with_friend)
    .bind(fields.with_friends)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    tracing::debug!(listing_id = id, "Listing updated");
    get_listing(pool, id).await
}

/// Delete a listing. Returns whether a row was removed.
pub async fn delete_listing(pool: &SqlitePool, id: i64) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM listings WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        tracing::debug!(listing_id = id, "Listing deleted");
    }
    Ok(deleted)
}

/// Flip `is_verified`. Returns the updated listing, or `None` if missing.
pub async fn toggle_verified(pool: &SqlitePool, id: i64) -> Result<Option<Listing>, SqliteError> {
    toggle_flag(pool, id, "is_verified").await
}

/// Flip `is_active`. Returns the updated listing, or `None` if missing.
pub async fn toggle_active(pool: &SqlitePool, id: i64) -> Result<Option<Listing>, SqliteError> {
    toggle_flag(pool, id, "is_active").await
}

/// `column` is one of the two fixed names above, never caller input
async fn toggle_flag(
    pool: &SqlitePool,
    id: i64,
    column: &'static str,
) -> Result<Option<Listing>, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let sql = format!(
        "UPDATE listings SET {col} = 1 - {col}, updated_at = ? WHERE id = ?",
        col = column
    );
    let result = sqlx::query(&sql).bind(now).bind(id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    tracing::debug!(listing_id = id, column, "Listing flag toggled");
    get_listing(pool, id).await
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::sqlite::repositories::create_city;
    use crate::data::sqlite::test_pool;
    use crate::domain::filters::{
        FilterState, ListingOrder, NumericRange, OtherTag, PageWindow, SortColumn,
        VerificationTag, translate,
    };

    fn fields(name: &str, city_id: i64) -> ListingFields {
        ListingFields {
            name: name.to_string(),
            age: 25,
            phone: "+70000000000".to_string(),
            price_1_hour: 4000,
            city_id,
            gender: "female".to_string(),
            in_call: true,
            ..Default::default()
        }
    }

    async fn setup() -> (SqlitePool, i64, i64) {
        let pool = test_pool().await;
        let moscow = create_city(&pool, None, "Москва", "moscow").await.unwrap();
        let spb = create_city(&pool, None, "Санкт-Петербург", "spb").await.unwrap();
        (pool, moscow.id, spb.id)
    }

    async fn ids(pool: &SqlitePool, state: &FilterState, city_id: Option<i64>) -> Vec<i64> {
        let mut ids: Vec<i64> = search_listings(pool, &translate(state, city_id))
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (pool, city, _) = setup().await;
        let mut input = fields("Анна", city);
        input.services = vec!["classic".into(), "massage_thai".into()];
        input.photos = vec!["/p/1.jpg".into(), "/p/2.jpg".into()];

        let created = create_listing(&pool, &input).await.unwrap();
        assert!(created.is_active);
        assert!(!created.is_verified);
        assert_eq!(created.services, input.services);
        assert_eq!(created.photos, input.photos);

        let fetched = get_listing(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(get_listing(&pool, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_with_unknown_city_fails() {
        let (pool, _, _) = setup().await;
        let err = create_listing(&pool, &fields("X", 42)).await.unwrap_err();
        assert!(matches!(err, SqliteError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let (pool, city, other_city) = setup().await;
        let created = create_listing(&pool, &fields("Анна", city)).await.unwrap();

        let mut input = fields("Анна К.", other_city);
        input.price_express = Some(1500);
        let updated = update_listing(&pool, created.id, &input)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Анна К.");
        assert_eq!(updated.city_id, other_city);
        assert_eq!(updated.price_express, Some(1500));
        assert_eq!(updated.created_at, created.created_at);

        assert!(update_listing(&pool, 999, &input).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_toggles_and_delete() {
        let (pool, city, _) = setup().await;
        let created = create_listing(&pool, &fields("Анна", city)).await.unwrap();

        let verified = toggle_verified(&pool, created.id).await.unwrap().unwrap();
        assert!(verified.is_verified);
        let unverified = toggle_verified(&pool, created.id).await.unwrap().unwrap();
        assert!(!unverified.is_verified);

        let inactive = toggle_active(&pool, created.id).await.unwrap().unwrap();
        assert!(!inactive.is_active);
        assert!(toggle_active(&pool, 999).await.unwrap().is_none());

        assert!(delete_listing(&pool, created.id).await.unwrap());
        assert!(!delete_listing(&pool, created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_inactive_listing_never_appears_in_public_search() {
        let (pool, city, _) = setup().await;
        let visible = create_listing(&pool, &fields("A", city)).await.unwrap();
        let hidden = create_listing(&pool, &fields("B", city)).await.unwrap();
        toggle_active(&pool, hidden.id).await.unwrap();

        assert_eq!(ids(&pool, &FilterState::default(), None).await, vec![visible.id]);

        let (all, total) = list_listings(&pool, 1, 20).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_widening_services_returns_superset() {
        let (pool, city, _) = setup().await;
        let mut a = fields("A", city);
        a.services = vec!["classic".into()];
        let mut b = fields("B", city);
        b.services = vec!["massage_thai".into(), "escort".into()];
        let c = fields("C", city);
        for f in [&a, &b, &c] {
            create_listing(&pool, f).await.unwrap();
        }

        let mut narrow = FilterState::default();
        narrow.services = BTreeSet::from(["classic".to_string()]);
        let mut wide = narrow.clone();
        wide.services.insert("escort".to_string());

        let narrow_ids = ids(&pool, &narrow, None).await;
        let wide_ids = ids(&pool, &wide, None).await;
        assert_eq!(narrow_ids.len(), 1);
        assert_eq!(wide_ids.len(), 2);
        assert!(narrow_ids.iter().all(|id| wide_ids.contains(id)));
    }

    #[tokio::test]
    async fn test_corrupted_services_column_does_not_match_or_error() {
        let (pool, city, _) = setup().await;
        let mut input = fields("A", city);
        input.services = vec!["classic".into()];
        let listing = create_listing(&pool, &input).await.unwrap();
        sqlx::query("UPDATE listings SET services = 'classic,anal' WHERE id = ?")
            .bind(listing.id)
            .execute(&pool)
            .await
            .unwrap();

        let mut state = FilterState::default();
        state.services.insert("classic".into());
        assert!(ids(&pool, &state, None).await.is_empty());

        let fetched = get_listing(&pool, listing.id).await.unwrap().unwrap();
        assert!(fetched.services.is_empty());
    }

    #[tokio::test]
    async fn test_default_age_range_equals_omitted() {
        let (pool, city, _) = setup().await;
        for age in [18, 30, 70] {
            let mut f = fields("A", city);
            f.age = age;
            create_listing(&pool, &f).await.unwrap();
        }

        let mut explicit = FilterState::default();
        explicit.appearance.age = NumericRange::new(18, 70);
        assert_eq!(
            ids(&pool, &explicit, None).await,
            ids(&pool, &FilterState::default(), None).await
        );

        explicit.appearance.age = NumericRange::new(18, 30);
        assert_eq!(ids(&pool, &explicit, None).await.len(), 2);
    }

    #[tokio::test]
    async fn test_price_window_in_city_ignores_express_and_outcall() {
        let (pool, moscow, spb) = setup().await;
        let cases = [
            (moscow, 3000, Some(1000), false),
            (moscow, 5000, None, true),
            (moscow, 2999, None, false),
            (moscow, 5001, None, false),
            (spb, 4000, None, false),
        ];
        let mut expected = Vec::new();
        for (city, price, express, outcall) in cases {
            let mut f = fields("A", city);
            f.price_1_hour = price;
            f.price_express = express;
            f.out_call = outcall;
            let listing = create_listing(&pool, &f).await.unwrap();
            if city == moscow && (3000..=5000).contains(&price) {
                expected.push(listing.id);
            }
        }

        let mut state = FilterState::default();
        state.price.from = Some(3000);
        state.price.to = Some(5000);
        assert_eq!(ids(&pool, &state, Some(moscow)).await, expected);

        state.price.has_express = true;
        assert_eq!(ids(&pool, &state, Some(moscow)).await, vec![expected[0]]);
    }

    #[tokio::test]
    async fn test_express_requires_positive_price() {
        let (pool, city, _) = setup().await;
        let mut priced = fields("A", city);
        priced.price_express = Some(1500);
        let mut zero = fields("B", city);
        zero.price_express = Some(0);
        let priced = create_listing(&pool, &priced).await.unwrap();
        let zero = create_listing(&pool, &zero).await.unwrap();
        let none = create_listing(&pool, &fields("C", city)).await.unwrap();

        let mut state = FilterState::default();
        assert_eq!(
            ids(&pool, &state, None).await,
            vec![priced.id, zero.id, none.id]
        );

        state.price.has_express = true;
        assert_eq!(ids(&pool, &state, None).await, vec![priced.id]);
    }

    #[tokio::test]
    async fn test_outcall_filter() {
        let (pool, city, _) = setup().await;
        let mut visiting = fields("A", city);
        visiting.out_call = true;
        let visiting = create_listing(&pool, &visiting).await.unwrap();
        let home = create_listing(&pool, &fields("B", city)).await.unwrap();

        let mut state = FilterState::default();
        assert_eq!(ids(&pool, &state, None).await, vec![visiting.id, home.id]);

        state.outcall = true;
        assert_eq!(ids(&pool, &state, None).await, vec![visiting.id]);
    }

    #[tokio::test]
    async fn test_verified_filter_excludes_unverified() {
        let (pool, city, _) = setup().await;
        let plain = create_listing(&pool, &fields("A", city)).await.unwrap();
        let verified = create_listing(&pool, &fields("B", city)).await.unwrap();
        toggle_verified(&pool, verified.id).await.unwrap();

        let mut state = FilterState::default();
        state.verification.insert(VerificationTag::Verified);
        let found = ids(&pool, &state, None).await;
        assert_eq!(found, vec![verified.id]);
        assert!(!found.contains(&plain.id));
    }

    #[tokio::test]
    async fn test_other_tags_match_any_flag() {
        let (pool, city, _) = setup().await;
        let mut a = fields("A", city);
        a.is_24_hours = true;
        let mut b = fields("B", city);
        b.is_non_smoking = true;
        let a = create_listing(&pool, &a).await.unwrap();
        let b = create_listing(&pool, &b).await.unwrap();
        create_listing(&pool, &fields("C", city)).await.unwrap();

        let mut state = FilterState::default();
        state.other = BTreeSet::from([OtherTag::AroundTheClock, OtherTag::NonSmoking]);
        assert_eq!(ids(&pool, &state, None).await, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_reset_read_equals_default_read() {
        let (pool, city, _) = setup().await;
        let mut f = fields("A", city);
        f.district = Some("Центр".into());
        create_listing(&pool, &f).await.unwrap();
        create_listing(&pool, &fields("B", city)).await.unwrap();

        let store = crate::domain::filters::FilterStore::new();
        store.apply_group(crate::domain::filters::GroupChange::District(BTreeSet::from([
            "Центр".to_string(),
        ])));
        assert_eq!(ids(&pool, &store.current().state, None).await.len(), 1);

        let reset = store.reset();
        assert_eq!(
            ids(&pool, &reset.state, None).await,
            ids(&pool, &FilterState::default(), None).await
        );
    }

    #[tokio::test]
    async fn test_order_and_page() {
        let (pool, city, _) = setup().await;
        for price in [3000, 1000, 2000] {
            let mut f = fields("A", city);
            f.price_1_hour = price;
            create_listing(&pool, &f).await.unwrap();
        }

        let newest_first = search_listings(&pool, &ListingQuery::default()).await.unwrap();
        let newest_ids: Vec<i64> = newest_first.iter().map(|l| l.id).collect();
        assert_eq!(newest_ids, vec![3, 2, 1]);

        let query = ListingQuery::default()
            .with_order(ListingOrder {
                column: SortColumn::Price1Hour,
                descending: false,
            })
            .with_page(PageWindow {
                limit: 2,
                offset: 1,
            });
        let prices: Vec<i64> = search_listings(&pool, &query)
            .await
            .unwrap()
            .iter()
            .map(|l| l.price_1_hour)
            .collect();
        assert_eq!(prices, vec![2000, 3000]);
    }
}
