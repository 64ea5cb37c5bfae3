//! City and district endpoints
//!
//! Reads are public and served through the reference-data cache. Writes are
//! admin-only and invalidate the affected cache keys inside the repository.

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::api::auth::AdminSession;
use crate::api::extractors::{IdPath, ValidatedJson};
use crate::api::types::ApiError;
use crate::data::DirectoryRepository;
use crate::data::cache::CacheService;

use types::{CityDto, CityRequest, DistrictDto, DistrictsRequest};

/// Shared state for city endpoints
#[derive(Clone)]
pub struct CitiesApiState {
    pub repository: Arc<dyn DirectoryRepository>,
    pub cache: Arc<CacheService>,
}

/// Public read routes
pub fn public_routes(repository: Arc<dyn DirectoryRepository>, cache: Arc<CacheService>) -> Router {
    Router::new()
        .route("/cities", get(list_cities))
        .route("/districts/{city_id}", get(list_districts))
        .with_state(CitiesApiState { repository, cache })
}

/// Admin write routes (mounted behind `require_auth`)
pub fn admin_routes(repository: Arc<dyn DirectoryRepository>, cache: Arc<CacheService>) -> Router {
    Router::new()
        .route("/cities", post(create_city))
        .route("/cities/{id}", put(update_city).delete(delete_city))
        .route("/districts/{city_id}", put(replace_districts))
        .with_state(CitiesApiState { repository, cache })
}

fn city_not_found(id: i64) -> ApiError {
    ApiError::not_found("CITY_NOT_FOUND", format!("City not found: {}", id))
}

/// List cities
#[utoipa::path(
    get,
    path = "/api/v1/cities",
    tag = "cities",
    responses(
        (status = 200, description = "All cities ordered by name", body = Vec<CityDto>)
    )
)]
pub async fn list_cities(
    State(state): State<CitiesApiState>,
) -> Result<Json<Vec<CityDto>>, ApiError> {
    let cities = state
        .repository
        .list_cities(Some(&state.cache))
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(cities.into_iter().map(CityDto::from).collect()))
}

/// List districts of a city
#[utoipa::path(
    get,
    path = "/api/v1/districts/{city_id}",
    tag = "cities",
    params(("city_id" = i64, Path, description = "City ID")),
    responses(
        (status = 200, description = "Districts of the city", body = Vec<DistrictDto>),
        (status = 404, description = "City not found")
    )
)]
pub async fn list_districts(
    State(state): State<CitiesApiState>,
    IdPath(city_id): IdPath,
) -> Result<Json<Vec<DistrictDto>>, ApiError> {
    let districts = state
        .repository
        .list_districts(Some(&state.cache), city_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| city_not_found(city_id))?;
    Ok(Json(districts.into_iter().map(DistrictDto::from).collect()))
}

/// Create a city
#[utoipa::path(
    post,
    path = "/api/v1/cities",
    tag = "cities",
    request_body = CityRequest,
    responses(
        (status = 201, description = "City created", body = CityDto),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_city(
    State(state): State<CitiesApiState>,
    session: AdminSession,
    ValidatedJson(body): ValidatedJson<CityRequest>,
) -> Result<(StatusCode, Json<CityDto>), ApiError> {
    let city = state
        .repository
        .create_city(Some(&state.cache), &body.name, &body.slug)
        .await
        .map_err(ApiError::from_data)?;
    tracing::info!(city_id = city.id, slug = %city.slug, admin = %session.subject, "City created");
    Ok((StatusCode::CREATED, Json(CityDto::from(city))))
}

/// Rename a city
#[utoipa::path(
    put,
    path = "/api/v1/cities/{id}",
    tag = "cities",
    params(("id" = i64, Path, description = "City ID")),
    request_body = CityRequest,
    responses(
        (status = 200, description = "City updated", body = CityDto),
        (status = 404, description = "City not found"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn update_city(
    State(state): State<CitiesApiState>,
    session: AdminSession,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<CityRequest>,
) -> Result<Json<CityDto>, ApiError> {
    let city = state
        .repository
        .update_city(Some(&state.cache), id, &body.name, &body.slug)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| city_not_found(id))?;
    tracing::info!(city_id = id, admin = %session.subject, "City updated");
    Ok(Json(CityDto::from(city)))
}

/// Delete a city without listings
#[utoipa::path(
    delete,
    path = "/api/v1/cities/{id}",
    tag = "cities",
    params(("id" = i64, Path, description = "City ID")),
    responses(
        (status = 204, description = "City deleted"),
        (status = 404, description = "City not found"),
        (status = 409, description = "City still has listings")
    )
)]
pub async fn delete_city(
    State(state): State<CitiesApiState>,
    session: AdminSession,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .repository
        .delete_city(Some(&state.cache), id)
        .await
        .map_err(|e| match e {
            crate::data::DataError::Conflict(message) => {
                ApiError::conflict("CITY_HAS_LISTINGS", message)
            }
            e => ApiError::from_data(e),
        })?;
    if !deleted {
        return Err(city_not_found(id));
    }
    tracing::info!(city_id = id, admin = %session.subject, "City deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the district list of a city
#[utoipa::path(
    put,
    path = "/api/v1/districts/{city_id}",
    tag = "cities",
    params(("city_id" = i64, Path, description = "City ID")),
    request_body = DistrictsRequest,
    responses(
        (status = 200, description = "New district list", body = Vec<DistrictDto>),
        (status = 404, description = "City not found")
    )
)]
pub async fn replace_districts(
    State(state): State<CitiesApiState>,
    session: AdminSession,
    IdPath(city_id): IdPath,
    ValidatedJson(body): ValidatedJson<DistrictsRequest>,
) -> Result<Json<Vec<DistrictDto>>, ApiError> {
    let names: Vec<String> = body.districts.iter().map(|n| n.trim().to_string()).collect();
    let districts = state
        .repository
        .replace_districts(Some(&state.cache), city_id, &names)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| city_not_found(city_id))?;
    tracing::info!(
        city_id,
        count = districts.len(),
        admin = %session.subject,
        "Districts replaced"
    );
    Ok(Json(districts.into_iter().map(DistrictDto::from).collect()))
}
