//! Listing types
//!
//! `ListingRow` mirrors the table, with `services` and `photos` still JSON
//! text. `Listing` is the decoded form handed to every caller.

use serde::{Deserialize, Serialize};

use crate::utils::json::decode_string_array;

/// Listing row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListingRow {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub breast_size: Option<i64>,
    pub phone: String,
    pub description: Option<String>,
    pub price_1_hour: i64,
    pub price_2_hours: Option<i64>,
    pub price_night: Option<i64>,
    pub price_express: Option<i64>,
    pub city_id: i64,
    pub district: Option<String>,
    pub gender: String,
    pub nationality: Option<String>,
    pub hair_color: Option<String>,
    pub bikini_zone: Option<String>,
    pub services: String,
    pub photos: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub has_verified_photos: bool,
    pub has_video: bool,
    pub has_reviews: bool,
    pub is_new: bool,
    pub is_waiting_call: bool,
    pub is_24_hours: bool,
    pub is_non_smoking: bool,
    pub in_call: bool,
    pub out_call: bool,
    pub is_alone: bool,
    pub with_friend: bool,
    pub with_friends: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Listing with decoded services and photos
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub breast_size: Option<i64>,
    pub phone: String,
    pub description: Option<String>,
    pub price_1_hour: i64,
    pub price_2_hours: Option<i64>,
    pub price_night: Option<i64>,
    pub price_express: Option<i64>,
    pub city_id: i64,
    pub district: Option<String>,
    pub gender: String,
    pub nationality: Option<String>,
    pub hair_color: Option<String>,
    pub bikini_zone: Option<String>,
    pub services: Vec<String>,
    /// Ordered; the first photo is the cover
    pub photos: Vec<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub has_verified_photos: bool,
    pub has_video: bool,
    pub has_reviews: bool,
    pub is_new: bool,
    pub is_waiting_call: bool,
    pub is_24_hours: bool,
    pub is_non_smoking: bool,
    pub in_call: bool,
    pub out_call: bool,
    pub is_alone: bool,
    pub with_friend: bool,
    pub with_friends: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Self {
            services: decode_string_array(&row.services),
            photos: decode_string_array(&row.photos),
            id: row.id,
            name: row.name,
            age: row.age,
            height: row.height,
            weight: row.weight,
            breast_size: row.breast_size,
            phone: row.phone,
            description: row.description,
            price_1_hour: row.price_1_hour,
            price_2_hours: row.price_2_hours,
            price_night: row.price_night,
            price_express: row.price_express,
            city_id: row.city_id,
            district: row.district,
            gender: row.gender,
            nationality: row.nationality,
            hair_color: row.hair_color,
            bikini_zone: row.bikini_zone,
            is_active: row.is_active,
            is_verified: row.is_verified,
            has_verified_photos: row.has_verified_photos,
            has_video: row.has_video,
            has_reviews: row.has_reviews,
            is_new: row.is_new,
            is_waiting_call: row.is_waiting_call,
            is_24_hours: row.is_24_hours,
            is_non_smoking: row.is_non_smoking,
            in_call: row.in_call,
            out_call: row.out_call,
            is_alone: row.is_alone,
            with_friend: row.with_friend,
            with_friends: row.with_friends,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Admin-editable listing fields.
///
/// Used for both create and full-replacement update. Activity and
/// verification are changed only through their toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFields {
    pub name: String,
    pub age: i64,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub breast_size: Option<i64>,
    pub phone: String,
    pub description: Option<String>,
    pub price_1_hour: i64,
    pub price_2_hours: Option<i64>,
    pub price_night: Option<i64>,
    pub price_express: Option<i64>,
    pub city_id: i64,
    pub district: Option<String>,
    pub gender: String,
    pub nationality: Option<String>,
    pub hair_color: Option<String>,
    pub bikini_zone: Option<String>,
    pub services: Vec<String>,
    pub photos: Vec<String>,
    pub has_verified_photos: bool,
    pub has_video: bool,
    pub has_reviews: bool,
    pub is_new: bool,
    pub is_waiting_call: bool,
    pub is_24_hours: bool,
    pub is_non_smoking: bool,
    pub in_call: bool,
    pub out_call: bool,
    pub is_alone: bool,
    pub with_friend: bool,
    pub with_friends: bool,
}
