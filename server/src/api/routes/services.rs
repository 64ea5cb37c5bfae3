//! Services catalog endpoint

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::catalog::{CATALOG, ServiceCategory, ServiceTag};

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceTagDto {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceCategoryDto {
    pub id: &'static str,
    pub label: &'static str,
    pub services: Vec<ServiceTagDto>,
}

impl From<&ServiceTag> for ServiceTagDto {
    fn from(tag: &ServiceTag) -> Self {
        Self {
            id: tag.id,
            label: tag.label,
        }
    }
}

impl From<&ServiceCategory> for ServiceCategoryDto {
    fn from(category: &ServiceCategory) -> Self {
        Self {
            id: category.id,
            label: category.label,
            services: category.tags.iter().map(ServiceTagDto::from).collect(),
        }
    }
}

pub fn routes() -> Router {
    Router::new().route("/services", get(list_services))
}

/// Services catalog grouped by category
#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "catalog",
    responses(
        (status = 200, description = "Services catalog", body = Vec<ServiceCategoryDto>)
    )
)]
pub async fn list_services() -> Json<Vec<ServiceCategoryDto>> {
    Json(CATALOG.iter().map(ServiceCategoryDto::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_catalog_grouped_by_category() {
        let response = routes()
            .oneshot(Request::builder().uri("/services").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let categories = body.as_array().unwrap();
        assert_eq!(categories.len(), CATALOG.len());

        let total: usize = categories
            .iter()
            .map(|c| c["services"].as_array().unwrap().len())
            .sum();
        assert_eq!(total, crate::domain::catalog::all_tags().count());
        assert_eq!(categories[0]["services"][0]["id"], "classic");
    }
}
