//! City and district API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::core::constants::MAX_SLUG_LEN;
use crate::data::types::{City, District};
use crate::utils::string::trimmed;

/// Maximum districts accepted in one replacement
pub const MAX_DISTRICTS: usize = 200;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl From<City> for CityDto {
    fn from(city: City) -> Self {
        Self {
            id: city.id,
            name: city.name,
            slug: city.slug,
            created_at: DateTime::from_timestamp(city.created_at, 0).unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDto {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
}

impl From<District> for DistrictDto {
    fn from(district: District) -> Self {
        Self {
            id: district.id,
            city_id: district.city_id,
            name: district.name,
        }
    }
}

/// Body for creating or renaming a city
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CityRequest {
    #[serde(deserialize_with = "trimmed")]
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
}

/// Body for replacing the districts of a city
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DistrictsRequest {
    #[validate(custom(function = "validate_district_names"))]
    pub districts: Vec<String>,
}

/// Lowercase ASCII letters, digits and single hyphens, up to `MAX_SLUG_LEN` chars
fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("slug").with_message(
            format!(
                "Slug must be 1-{} lowercase letters, digits or single hyphens",
                MAX_SLUG_LEN
            )
            .into(),
        ))
    }
}

fn validate_district_names(names: &[String]) -> Result<(), ValidationError> {
    if names.len() > MAX_DISTRICTS {
        return Err(ValidationError::new("districts_len").with_message(
            format!("At most {} districts per city", MAX_DISTRICTS).into(),
        ));
    }
    if names.iter().any(|n| n.trim().is_empty() || n.len() > 100) {
        return Err(ValidationError::new("district_name")
            .with_message("District names must be 1-100 characters".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_validation() {
        assert!(validate_slug("moscow").is_ok());
        assert!(validate_slug("nizhny-novgorod").is_ok());
        assert!(validate_slug("spb2").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Moscow").is_err());
        assert!(validate_slug("-moscow").is_err());
        assert!(validate_slug("a--b").is_err());
        assert!(validate_slug("москва").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN)).is_ok());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
    }

    #[test]
    fn test_city_name_trimmed_before_validation() {
        let req: CityRequest =
            serde_json::from_value(serde_json::json!({ "name": "  Казань ", "slug": "kazan" }))
                .unwrap();
        assert_eq!(req.name, "Казань");
        assert!(req.validate().is_ok());

        let req: CityRequest =
            serde_json::from_value(serde_json::json!({ "name": "   ", "slug": "kazan" })).unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn test_district_names_validation() {
        assert!(validate_district_names(&["Центр".to_string()]).is_ok());
        assert!(validate_district_names(&[]).is_ok());
        assert!(validate_district_names(&["  ".to_string()]).is_err());
        let many = vec!["x".to_string(); MAX_DISTRICTS + 1];
        assert!(validate_district_names(&many).is_err());
    }
}
