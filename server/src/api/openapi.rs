//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::{auth, cities, health, profiles, services};
use crate::api::types::{OrderDirection, PaginationMeta};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vitrina API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Listings directory with faceted search"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Admin session endpoints"),
        (name = "catalog", description = "Services catalog"),
        (name = "cities", description = "Cities and districts"),
        (name = "profiles", description = "Public listing search"),
        (name = "admin", description = "Listing management (requires a session)")
    ),
    paths(
        // Health
        health::health,
        // Auth
        auth::exchange_token,
        auth::auth_status,
        // Catalog
        services::list_services,
        // Cities
        cities::list_cities,
        cities::list_districts,
        cities::create_city,
        cities::update_city,
        cities::delete_city,
        cities::replace_districts,
        // Profiles
        profiles::search_profiles,
        profiles::get_profile,
        profiles::create_profile,
        profiles::update_profile,
        profiles::delete_profile,
        profiles::toggle_verified,
        profiles::toggle_active,
        profiles::list_all_profiles,
    ),
    components(schemas(
        PaginationMeta,
        OrderDirection,
        health::HealthResponse,
        auth::ExchangeRequest,
        auth::ExchangeResponse,
        auth::AuthStatusResponse,
        services::ServiceCategoryDto,
        services::ServiceTagDto,
        cities::types::CityDto,
        cities::types::DistrictDto,
        cities::types::CityRequest,
        cities::types::DistrictsRequest,
        profiles::types::ListingDto,
        profiles::types::ListingRequest,
        profiles::types::AdminListQuery,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Vitrina API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/v1/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true
            });
        };
    </script>
</body>
</html>"#;
