//! Listing ("profile") endpoints
//!
//! The public side only ever sees active listings. Admin routes see and
//! mutate everything.

pub mod query;
pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};

use crate::api::auth::AdminSession;
use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::{DataError, DirectoryRepository};
use crate::data::types::ListingFields;

use query::ProfilesQuery;
use types::{AdminListQuery, ListingDto, ListingRequest};

/// Shared state for listing endpoints
#[derive(Clone)]
pub struct ProfilesApiState {
    pub repository: Arc<dyn DirectoryRepository>,
}

/// Public read routes
pub fn public_routes(repository: Arc<dyn DirectoryRepository>) -> Router {
    Router::new()
        .route("/profiles", get(search_profiles))
        .route("/profiles/{id}", get(get_profile))
        .with_state(ProfilesApiState { repository })
}

/// Admin routes (mounted behind `require_auth`)
pub fn admin_routes(repository: Arc<dyn DirectoryRepository>) -> Router {
    Router::new()
        .route("/profiles", post(create_profile))
        .route("/profiles/{id}", put(update_profile).delete(delete_profile))
        .route("/profiles/{id}/verify", patch(toggle_verified))
        .route("/profiles/{id}/toggle-active", patch(toggle_active))
        .route("/admin/profiles", get(list_all_profiles))
        .with_state(ProfilesApiState { repository })
}

fn profile_not_found(id: i64) -> ApiError {
    ApiError::not_found("PROFILE_NOT_FOUND", format!("Profile not found: {}", id))
}

/// Unknown `cityId` on a write is reported as a missing city, not a missing profile
fn map_write_error(e: DataError) -> ApiError {
    match e {
        DataError::NotFound(what) => {
            ApiError::not_found("CITY_NOT_FOUND", format!("Not found: {}", what))
        }
        e => ApiError::from_data(e),
    }
}

/// Search active listings
#[utoipa::path(
    get,
    path = "/api/v1/profiles",
    tag = "profiles",
    params(ProfilesQuery),
    responses(
        (status = 200, description = "Matching active listings", body = Vec<ListingDto>),
        (status = 400, description = "Invalid filter parameters")
    )
)]
pub async fn search_profiles(
    State(state): State<ProfilesApiState>,
    ValidatedQuery(params): ValidatedQuery<ProfilesQuery>,
) -> Result<Json<Vec<ListingDto>>, ApiError> {
    let query = params.to_listing_query()?;
    let listings = state
        .repository
        .search_listings(&query)
        .await
        .map_err(ApiError::from_data)?;
    tracing::debug!(
        city_id = ?query.city_id,
        criteria = query.criteria.len(),
        results = listings.len(),
        "Profile search"
    );
    Ok(Json(listings.into_iter().map(ListingDto::from).collect()))
}

/// Get one active listing
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{id}",
    tag = "profiles",
    params(("id" = i64, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing", body = ListingDto),
        (status = 404, description = "Listing not found or inactive")
    )
)]
pub async fn get_profile(
    State(state): State<ProfilesApiState>,
    IdPath(id): IdPath,
) -> Result<Json<ListingDto>, ApiError> {
    let listing = state
        .repository
        .get_listing(id)
        .await
        .map_err(ApiError::from_data)?
        .filter(|l| l.is_active)
        .ok_or_else(|| profile_not_found(id))?;
    Ok(Json(ListingDto::from(listing)))
}

/// Create a listing
#[utoipa::path(
    post,
    path = "/api/v1/profiles",
    tag = "admin",
    request_body = ListingRequest,
    responses(
        (status = 201, description = "Listing created", body = ListingDto),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "City not found")
    )
)]
pub async fn create_profile(
    State(state): State<ProfilesApiState>,
    session: AdminSession,
    ValidatedJson(body): ValidatedJson<ListingRequest>,
) -> Result<(StatusCode, Json<ListingDto>), ApiError> {
    let fields = ListingFields::from(body);
    let listing = state
        .repository
        .create_listing(&fields)
        .await
        .map_err(map_write_error)?;
    tracing::info!(listing_id = listing.id, admin = %session.subject, "Profile created");
    Ok((StatusCode::CREATED, Json(ListingDto::from(listing))))
}

/// Replace the editable fields of a listing
#[utoipa::path(
    put,
    path = "/api/v1/profiles/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Listing ID")),
    request_body = ListingRequest,
    responses(
        (status = 200, description = "Listing updated", body = ListingDto),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Listing or city not found")
    )
)]
pub async fn update_profile(
    State(state): State<ProfilesApiState>,
    session: AdminSession,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<ListingRequest>,
) -> Result<Json<ListingDto>, ApiError> {
    let fields = ListingFields::from(body);
    let listing = state
        .repository
        .update_listing(id, &fields)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| profile_not_found(id))?;
    tracing::info!(listing_id = id, admin = %session.subject, "Profile updated");
    Ok(Json(ListingDto::from(listing)))
}

/// Delete a listing
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{id}",
    tag = "admin",
    params(("id" = i64, Path, description = "Listing ID")),
    responses(
        (status = 204, description = "Listing deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn delete_profile(
    State(state): State<ProfilesApiState>,
    session: AdminSession,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .repository
        .delete_listing(id)
        .await
        .map_err(ApiError::from_data)?;
    if !deleted {
        return Err(profile_not_found(id));
    }
    tracing::info!(listing_id = id, admin = %session.subject, "Profile deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Flip the verified flag
#[utoipa::path(
    patch,
    path = "/api/v1/profiles/{id}/verify",
    tag = "admin",
    params(("id" = i64, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Updated listing", body = ListingDto),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn toggle_verified(
    State(state): State<ProfilesApiState>,
    session: AdminSession,
    IdPath(id): IdPath,
) -> Result<Json<ListingDto>, ApiError> {
    let listing = state
        .repository
        .toggle_verified(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| profile_not_found(id))?;
    tracing::info!(
        listing_id = id,
        verified = listing.is_verified,
        admin = %session.subject,
        "Profile verification toggled"
    );
    Ok(Json(ListingDto::from(listing)))
}

/// Flip the active flag (hides or publishes the listing)
#[utoipa::path(
    patch,
    path = "/api/v1/profiles/{id}/toggle-active",
    tag = "admin",
    params(("id" = i64, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Updated listing", body = ListingDto),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn toggle_active(
    State(state): State<ProfilesApiState>,
    session: AdminSession,
    IdPath(id): IdPath,
) -> Result<Json<ListingDto>, ApiError> {
    let listing = state
        .repository
        .toggle_active(id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| profile_not_found(id))?;
    tracing::info!(
        listing_id = id,
        active = listing.is_active,
        admin = %session.subject,
        "Profile activity toggled"
    );
    Ok(Json(ListingDto::from(listing)))
}

/// Every listing including inactive ones, newest first
#[utoipa::path(
    get,
    path = "/api/v1/admin/profiles",
    tag = "admin",
    params(
        ("page" = Option<u32>, Query, description = "Page number (1-1000)"),
        ("limit" = Option<u32>, Query, description = "Items per page (1-200)")
    ),
    responses(
        (status = 200, description = "Listings with pagination metadata"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_all_profiles(
    State(state): State<ProfilesApiState>,
    _session: AdminSession,
    ValidatedQuery(query): ValidatedQuery<AdminListQuery>,
) -> Result<Json<PaginatedResponse<ListingDto>>, ApiError> {
    let (listings, total) = state
        .repository
        .list_listings(query.page, query.limit)
        .await
        .map_err(ApiError::from_data)?;
    let data = listings.into_iter().map(ListingDto::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        query.page,
        query.limit,
        total,
    )))
}
