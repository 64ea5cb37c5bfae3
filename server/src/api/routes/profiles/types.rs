//! Listing API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::types::{default_limit, default_page, validate_limit, validate_page};
use crate::data::types::{Listing, ListingFields};
use crate::domain::catalog;
use crate::utils::string::{trimmed, trimmed_opt};

/// Maximum photos per listing
pub const MAX_PHOTOS: usize = 30;

/// Listing as returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingDto {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for ListingDto {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            name: l.name,
            age: l.age,
            height: l.height,
            weight: l.weight,
            breast_size: l.breast_size,
            phone: l.phone,
            description: l.description,
            price_1_hour: l.price_1_hour,
            price_2_hours: l.price_2_hours,
            price_night: l.price_night,
            price_express: l.price_express,
            city_id: l.city_id,
            district: l.district,
            gender: l.gender,
            nationality: l.nationality,
            hair_color: l.hair_color,
            bikini_zone: l.bikini_zone,
            services: l.services,
            photos: l.photos,
            is_active: l.is_active,
            is_verified: l.is_verified,
            has_verified_photos: l.has_verified_photos,
            has_video: l.has_video,
            has_reviews: l.has_reviews,
            is_new: l.is_new,
            is_waiting_call: l.is_waiting_call,
            is_24_hours: l.is_24_hours,
            is_non_smoking: l.is_non_smoking,
            in_call: l.in_call,
            out_call: l.out_call,
            is_alone: l.is_alone,
            with_friend: l.with_friend,
            with_friends: l.with_friends,
            created_at: DateTime::from_timestamp(l.created_at, 0).unwrap_or_else(Utc::now),
            updated_at: DateTime::from_timestamp(l.updated_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// Body for creating a listing or replacing its editable fields.
///
/// Text fields are trimmed while deserializing, so length checks apply to
/// the stored value and blank optional fields become `None`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(range(min = 18, max = 99, message = "Age must be 18-99"))]
    pub age: i64,

    #[validate(range(min = 100, max = 250, message = "Height must be 100-250 cm"))]
    pub height: Option<i64>,

    #[validate(range(min = 30, max = 250, message = "Weight must be 30-250 kg"))]
    pub weight: Option<i64>,

    #[validate(range(min = 0, max = 10, message = "Breast size must be 0-10"))]
    pub breast_size: Option<i64>,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 5, max = 32, message = "Phone must be 5-32 characters"))]
    pub phone: String,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_1_hour: i64,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_2_hours: Option<i64>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_night: Option<i64>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_express: Option<i64>,

    #[validate(range(min = 1, message = "City id must be positive"))]
    pub city_id: i64,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 100, message = "District must be 1-100 characters"))]
    pub district: Option<String>,

    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 32, message = "Gender must be 1-32 characters"))]
    pub gender: String,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 64, message = "Nationality must be 1-64 characters"))]
    pub nationality: Option<String>,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 64, message = "Hair color must be 1-64 characters"))]
    pub hair_color: Option<String>,

    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, max = 64, message = "Bikini zone must be 1-64 characters"))]
    pub bikini_zone: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_services"))]
    pub services: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_photos"))]
    pub photos: Vec<String>,

    #[serde(default)]
    pub has_verified_photos: bool,
    #[serde(default)]
    pub has_video: bool,
    #[serde(default)]
    pub has_reviews: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_waiting_call: bool,
    #[serde(default)]
    pub is_24_hours: bool,
    #[serde(default)]
    pub is_non_smoking: bool,
    #[serde(default)]
    pub in_call: bool,
    #[serde(default)]
    pub out_call: bool,
    #[serde(default)]
    pub is_alone: bool,
    #[serde(default)]
    pub with_friend: bool,
    #[serde(default)]
    pub with_friends: bool,
}

impl From<ListingRequest> for ListingFields {
    fn from(r: ListingRequest) -> Self {
        let mut services = r.services;
        services.sort();
        services.dedup();

        Self {
            name: r.name,
            age: r.age,
            height: r.height,
            weight: r.weight,
            breast_size: r.breast_size,
            phone: r.phone,
            description: r.description,
            price_1_hour: r.price_1_hour,
            price_2_hours: r.price_2_hours,
            price_night: r.price_night,
            price_express: r.price_express,
            city_id: r.city_id,
            district: r.district,
            gender: r.gender,
            nationality: r.nationality,
            hair_color: r.hair_color,
            bikini_zone: r.bikini_zone,
            services,
            photos: r.photos,
            has_verified_photos: r.has_verified_photos,
            has_video: r.has_video,
            has_reviews: r.has_reviews,
            is_new: r.is_new,
            is_waiting_call: r.is_waiting_call,
            is_24_hours: r.is_24_hours,
            is_non_smoking: r.is_non_smoking,
            in_call: r.in_call,
            out_call: r.out_call,
            is_alone: r.is_alone,
            with_friend: r.with_friend,
            with_friends: r.with_friends,
        }
    }
}

/// Every service must exist in the catalog
fn validate_services(services: &[String]) -> Result<(), ValidationError> {
    let unknown = catalog::unknown_services(services.iter().map(String::as_str));
    if unknown.is_empty() {
        return Ok(());
    }
    Err(ValidationError::new("unknown_service")
        .with_message(format!("Unknown services: {}", unknown.join(", ")).into()))
}

fn validate_photos(photos: &[String]) -> Result<(), ValidationError> {
    if photos.len() > MAX_PHOTOS {
        return Err(ValidationError::new("photos_len")
            .with_message(format!("At most {} photos per listing", MAX_PHOTOS).into()));
    }
    if photos.iter().any(|p| p.trim().is_empty() || p.len() > 2048) {
        return Err(ValidationError::new("photo_url")
            .with_message("Photo URLs must be 1-2048 characters".into()));
    }
    Ok(())
}

/// Query params for the admin listing view
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminListQuery {
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,

    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> serde_json::Value {
        serde_json::json!({
            "name": "Anna",
            "age": 25,
            "phone": "+7 900 000-00-00",
            "price1Hour": 4000,
            "cityId": 1,
            "gender": "female",
            "services": ["classic", "kissing", "classic"]
        })
    }

    #[test]
    fn test_request_camel_case_and_defaults() {
        let req: ListingRequest = serde_json::from_value(request()).unwrap();
        assert!(req.validate().is_ok());
        assert!(!req.is_24_hours);
        assert!(req.photos.is_empty());

        let fields = ListingFields::from(req);
        assert_eq!(fields.services, vec!["classic", "kissing"]);
        assert_eq!(fields.price_1_hour, 4000);
    }

    #[test]
    fn test_unknown_service_rejected() {
        let mut body = request();
        body["services"] = serde_json::json!(["classic", "teleportation"]);
        let req: ListingRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("services"));
    }

    #[test]
    fn test_bounds_rejected() {
        let mut body = request();
        body["age"] = serde_json::json!(17);
        body["price1Hour"] = serde_json::json!(-1);
        let req: ListingRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("age"));
        assert!(fields.contains_key("price_1_hour"));
    }

    #[test]
    fn test_blank_text_rejected_after_trim() {
        let mut body = request();
        body["name"] = serde_json::json!("   ");
        body["phone"] = serde_json::json!("  12  ");
        let req: ListingRequest = serde_json::from_value(body).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_tags_are_trimmed() {
        let mut body = request();
        body["gender"] = serde_json::json!(" female ");
        body["district"] = serde_json::json!("Центр ");
        body["nationality"] = serde_json::json!("   ");
        let req: ListingRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_ok());

        let fields = ListingFields::from(req);
        assert_eq!(fields.gender, "female");
        assert_eq!(fields.district.as_deref(), Some("Центр"));
        assert_eq!(fields.nationality, None);
    }

    #[test]
    fn test_dto_uses_camel_case() {
        let dto = ListingDto::from(Listing {
            id: 1,
            is_24_hours: true,
            price_2_hours: Some(7000),
            created_at: 1_700_000_000,
            ..Default::default()
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["is24Hours"], true);
        assert_eq!(json["price2Hours"], 7000);
        assert_eq!(json["createdAt"], "2023-11-14T22:13:20Z");
    }
}
