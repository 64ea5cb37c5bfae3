//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::Redirect;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::auth::{AuthManager, require_auth};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{auth, cities, health, profiles, services};
use crate::core::CoreApp;
use crate::core::constants::{API_PREFIX, AUTH_BODY_LIMIT, DEFAULT_BODY_LIMIT};
use crate::data::DirectoryRepository;
use crate::data::cache::CacheService;

/// Everything the router needs, independent of process startup
#[derive(Clone)]
pub struct RouterDeps {
    pub repository: Arc<dyn DirectoryRepository>,
    pub cache: Arc<CacheService>,
    pub auth_manager: Arc<AuthManager>,
    pub allowed_origins: AllowedOrigins,
}

/// Assemble the full HTTP surface under `/api/v1`
pub fn build_router(deps: RouterDeps) -> Router {
    let RouterDeps {
        repository,
        cache,
        auth_manager,
        allowed_origins,
    } = deps;

    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(swagger_ui_html))
        .merge(services::routes())
        .merge(cities::public_routes(repository.clone(), cache.clone()))
        .merge(profiles::public_routes(repository.clone()));

    let admin_routes = Router::new()
        .merge(cities::admin_routes(repository.clone(), cache))
        .merge(profiles::admin_routes(repository))
        .layer(axum::middleware::from_fn_with_state(
            auth_manager.clone(),
            require_auth,
        ));

    let auth_routes = auth::routes(auth_manager).layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT));

    let api = public_routes
        .merge(admin_routes)
        .nest("/auth", auth_routes);

    Router::new()
        .route(
            "/",
            get(|| async { Redirect::temporary(&format!("{}/docs", API_PREFIX)) }),
        )
        .nest(API_PREFIX, api)
        .fallback(middleware::handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(middleware::cors(&allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Serve until shutdown is triggered. Returns CoreApp for graceful shutdown.
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let router = build_router(RouterDeps {
            repository: Arc::new(app.database.clone()),
            cache: app.cache.clone(),
            auth_manager: app.auth.clone(),
            allowed_origins,
        });

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(%addr, "HTTP server listening");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}
