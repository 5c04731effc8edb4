//! Public controversy screens
//!
//! - `GET /` lists controversies by name
//! - `GET /:slug/` shows one controversy with its three charts
//! - `POST /:slug/` adds a data point to that controversy
//! - `GET /api/:slug/charts` serves the chart descriptors as JSON

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Serialize;
use tracing::{info, warn};

use controversy_common::db::{create_data_point, get_controversy_by_slug, list_controversies};

use crate::detail::{load_detail, ChartDescriptor};
use crate::error::{ApiError, ApiResult, PageResult};
use crate::forms::{clean_data_point, DataPointSubmission, FormErrors};
use crate::render::pages::{detail_page, index_page};
use crate::AppState;

/// GET /
pub async fn index(State(state): State<AppState>) -> PageResult<Html<String>> {
    let controversies = list_controversies(&state.db).await?;
    Ok(Html(index_page(&controversies)))
}

/// GET /:slug/
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> PageResult<Html<String>> {
    let detail = load_detail(&state.db, &slug).await?;
    let form = DataPointSubmission {
        controversy: Some(detail.controversy.id.to_string()),
        ..Default::default()
    };
    Ok(Html(detail_page(&detail, &form, &FormErrors::default())))
}

/// POST /:slug/
///
/// The new point always belongs to the controversy named by the URL. On
/// success redirects back to the detail page; on validation failure the
/// page is re-rendered with the submitted values and field errors (422).
pub async fn add_data_point(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(submission): Form<DataPointSubmission>,
) -> PageResult<Response> {
    let controversy = get_controversy_by_slug(&state.db, &slug).await?;

    if let Some(submitted) = submission.controversy.as_deref() {
        if submitted.trim() != controversy.id.to_string() {
            warn!(
                "Ignoring submitted controversy '{}' for POST to '{}'",
                submitted, controversy.slug
            );
        }
    }

    match clean_data_point(&submission, controversy.id) {
        Ok(new_point) => {
            let point = create_data_point(&state.db, &new_point).await?;
            info!(
                "Added data point '{}' to controversy '{}'",
                point.name, controversy.slug
            );
            Ok(Redirect::to(&controversy.absolute_url()).into_response())
        }
        Err(errors) => {
            warn!("Rejected data point for '{}': {}", controversy.slug, errors);
            let detail = load_detail(&state.db, &slug).await?;
            let html = detail_page(&detail, &submission, &errors);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response())
        }
    }
}

/// GET /:slug
///
/// Redirects to the slash-terminated detail path. Segments that could never
/// be a slug are answered with 404 instead.
pub async fn append_slash(Path(slug): Path<String>) -> PageResult<Redirect> {
    let is_slug_shaped = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !is_slug_shaped {
        return Err(ApiError::NotFound(format!("'{}'", slug)).into());
    }
    Ok(Redirect::permanent(&format!("/{}/", slug)))
}

/// Chart descriptors for one controversy
#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub slug: String,
    pub name: String,
    pub charts: Vec<ChartDescriptor>,
}

/// GET /api/:slug/charts
pub async fn chart_data(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ChartsResponse>> {
    let detail = load_detail(&state.db, &slug).await?;
    Ok(Json(ChartsResponse {
        slug: detail.controversy.slug,
        name: detail.controversy.name,
        charts: detail.charts,
    }))
}
