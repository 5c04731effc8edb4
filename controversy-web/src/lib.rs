//! controversy-web library - HTTP service for the controversy catalogue
//!
//! Exposes the router and state so integration tests can drive handlers
//! without binding a socket.

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod detail;
pub mod error;
pub mod forms;
pub mod render;

pub use crate::error::{ApiError, ApiResult, PageError, PageResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::index))
        .route("/static/site.css", get(api::serve_site_css))
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/:slug/charts", get(api::chart_data))
        .merge(api::health_routes())
        .merge(api::admin_routes())
        .route("/:slug/", get(api::detail).post(api::add_data_point))
        .route("/:slug", get(api::append_slash))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
