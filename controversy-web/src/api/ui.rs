//! Static asset serving
//!
//! The stylesheet is embedded at compile time.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

const SITE_CSS: &str = include_str!("../../static/site.css");

/// GET /static/site.css
pub async fn serve_site_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        SITE_CSS,
    )
        .into_response()
}
