//! Shared API types
//!
//! Common types used across all API endpoints including error handling,
//! pagination, and sorting.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationError;

use crate::core::constants::{DEFAULT_ADMIN_PAGE_LIMIT, MAX_ADMIN_PAGE_LIMIT};
use crate::data::DataError;
use crate::domain::filters::FilterError;

/// Maximum page number to prevent expensive OFFSET queries
pub const MAX_PAGE: u32 = 1000;
/// Default page number
pub const DEFAULT_PAGE: u32 = 1;

/// Validator function for page parameter
pub fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::new("page_min").with_message("Page must be >= 1".into()));
    }
    if page > MAX_PAGE {
        return Err(ValidationError::new("page_max").with_message(
            format!("Page must be <= {} to prevent expensive queries", MAX_PAGE).into(),
        ));
    }
    Ok(())
}

/// Validator function for admin limit parameter
pub fn validate_limit(limit: u32) -> Result<(), ValidationError> {
    if limit == 0 || limit > MAX_ADMIN_PAGE_LIMIT {
        return Err(ValidationError::new("limit_range").with_message(
            format!("Limit must be between 1 and {}", MAX_ADMIN_PAGE_LIMIT).into(),
        ));
    }
    Ok(())
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Map a data-layer error; storage failures are logged and hidden from the client
    pub fn from_data(e: DataError) -> Self {
        match e {
            DataError::NotFound(what) => {
                Self::not_found("NOT_FOUND", format!("Not found: {}", what))
            }
            DataError::Conflict(message) => Self::conflict("CONFLICT", message),
            e if e.is_transient() => {
                tracing::warn!(error = %e, "Transient data error");
                Self::ServiceUnavailable {
                    message: "Database temporarily unavailable".to_string(),
                }
            }
            e => {
                tracing::error!(error = %e, "Data error");
                Self::internal("Database operation failed")
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        Self::bad_request("VALIDATION_ERROR", e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

pub fn default_page() -> u32 {
    DEFAULT_PAGE
}

pub fn default_limit() -> u32 {
    DEFAULT_ADMIN_PAGE_LIMIT
}

/// Pagination metadata in response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u32, limit: u32, total_items: u64) -> Self {
        Self {
            page,
            limit,
            total_items,
            total_pages: total_items.div_ceil(limit as u64),
        }
    }
}

/// Generic paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, limit: u32, total_items: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta::new(page, limit, total_items),
        }
    }
}

/// OrderBy query parameter parsing (`column`, `column:asc`, `column:desc`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub enum OrderDirection {
    #[default]
    Desc,
    Asc,
}

impl OrderBy {
    pub fn parse(s: &str, allowed_columns: &[&str]) -> Result<Self, ApiError> {
        let parts: Vec<&str> = s.split(':').collect();
        let (column, direction) = match parts.as_slice() {
            [col] => (*col, OrderDirection::Desc),
            [col, "asc"] => (*col, OrderDirection::Asc),
            [col, "desc"] => (*col, OrderDirection::Desc),
            _ => {
                return Err(ApiError::bad_request(
                    "INVALID_ORDER",
                    "Invalid orderBy format. Use 'column' or 'column:asc' or 'column:desc'",
                ));
            }
        };
        if !allowed_columns.contains(&column) {
            return Err(ApiError::bad_request(
                "INVALID_ORDER_COLUMN",
                format!(
                    "Cannot order by: {} (allowed: {})",
                    column,
                    allowed_columns.join(", ")
                ),
            ));
        }
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }

    pub fn is_descending(&self) -> bool {
        self.direction == OrderDirection::Desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_parse() {
        let allowed = ["createdAt", "age"];
        let order = OrderBy::parse("age:asc", &allowed).unwrap();
        assert_eq!(order.column, "age");
        assert!(!order.is_descending());

        assert!(OrderBy::parse("createdAt", &allowed).unwrap().is_descending());
        assert!(OrderBy::parse("phone", &allowed).is_err());
        assert!(OrderBy::parse("age:sideways", &allowed).is_err());
        assert!(OrderBy::parse("age:asc:desc", &allowed).is_err());
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(2, 50, 101);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(PaginationMeta::new(1, 50, 0).total_pages, 0);
    }

    #[test]
    fn test_validate_page_and_limit() {
        assert!(validate_page(0).is_err());
        assert!(validate_page(1).is_ok());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(MAX_ADMIN_PAGE_LIMIT).is_ok());
        assert!(validate_limit(MAX_ADMIN_PAGE_LIMIT + 1).is_err());
    }

    #[test]
    fn test_from_data_status_mapping() {
        let status = |e: DataError| ApiError::from_data(e).into_response().status();
        assert_eq!(status(DataError::NotFound("city 9".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(DataError::Conflict("busy".into())), StatusCode::CONFLICT);
        assert_eq!(
            status(DataError::Sqlite(sqlx::Error::PoolTimedOut)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(DataError::Sqlite(sqlx::Error::RowNotFound)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_filter_error_is_bad_request() {
        let err: ApiError = FilterError::InvertedPrice { from: 5, to: 1 }.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
