//! Admin screens
//!
//! Unauthenticated create / edit / list / delete for controversies and data
//! points. Controversy slugs left blank are filled from the name.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::warn;

use controversy_common::db::{
    create_controversy, create_data_point, delete_controversy, delete_data_point,
    get_controversy, get_data_point, list_all_data_points, list_controversies,
    update_controversy, update_data_point,
};
use controversy_common::Error;

use crate::error::PageResult;
use crate::forms::{
    clean_admin_data_point, clean_controversy, ControversySubmission, DataPointSubmission,
    FormErrors,
};
use crate::render::admin::{
    admin_index_page, controversy_form_page, controversy_list_page, point_form_page,
    point_list_page, protected_page,
};
use crate::AppState;

const CONTROVERSY_LIST: &str = "/admin/controversies/";
const POINT_LIST: &str = "/admin/points/";

/// Build admin routes
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/", get(admin_index))
        .route("/admin/controversies/", get(controversy_list))
        .route(
            "/admin/controversies/add/",
            get(controversy_add_form).post(controversy_add),
        )
        .route(
            "/admin/controversies/:id/",
            get(controversy_edit_form).post(controversy_edit),
        )
        .route("/admin/controversies/:id/delete/", post(controversy_delete))
        .route("/admin/points/", get(point_list))
        .route("/admin/points/add/", get(point_add_form).post(point_add))
        .route("/admin/points/:id/", get(point_edit_form).post(point_edit))
        .route("/admin/points/:id/delete/", post(point_delete))
}

/// GET /admin/
pub async fn admin_index(State(state): State<AppState>) -> PageResult<Html<String>> {
    let controversies = list_controversies(&state.db).await?.len();
    let points = list_all_data_points(&state.db).await?.len();
    Ok(Html(admin_index_page(controversies, points)))
}

// -----------------------------------------------------------------------------
// Controversies
// -----------------------------------------------------------------------------

/// GET /admin/controversies/
pub async fn controversy_list(State(state): State<AppState>) -> PageResult<Html<String>> {
    let controversies = list_controversies(&state.db).await?;
    Ok(Html(controversy_list_page(&controversies)))
}

/// GET /admin/controversies/add/
pub async fn controversy_add_form() -> Html<String> {
    Html(controversy_form_page(
        "Add controversy",
        "/admin/controversies/add/",
        &ControversySubmission::default(),
        &FormErrors::default(),
        None,
    ))
}

/// POST /admin/controversies/add/
pub async fn controversy_add(
    State(state): State<AppState>,
    Form(submission): Form<ControversySubmission>,
) -> PageResult<Response> {
    let errors = match clean_controversy(&submission) {
        Ok(new) => match create_controversy(&state.db, &new).await {
            Ok(_) => return Ok(Redirect::to(CONTROVERSY_LIST).into_response()),
            Err(e) => slug_error(e)?,
        },
        Err(errors) => errors,
    };

    Ok(invalid(controversy_form_page(
        "Add controversy",
        "/admin/controversies/add/",
        &submission,
        &errors,
        None,
    )))
}

/// GET /admin/controversies/:id/
pub async fn controversy_edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> PageResult<Html<String>> {
    let controversy = get_controversy(&state.db, id).await?;
    let (action, delete) = controversy_actions(id);

    Ok(Html(controversy_form_page(
        "Change controversy",
        &action,
        &ControversySubmission::from(&controversy),
        &FormErrors::default(),
        Some(&delete),
    )))
}

/// POST /admin/controversies/:id/
pub async fn controversy_edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(submission): Form<ControversySubmission>,
) -> PageResult<Response> {
    get_controversy(&state.db, id).await?;
    let (action, delete) = controversy_actions(id);

    let errors = match clean_controversy(&submission) {
        Ok(changes) => match update_controversy(&state.db, id, &changes).await {
            Ok(_) => return Ok(Redirect::to(CONTROVERSY_LIST).into_response()),
            Err(e) => slug_error(e)?,
        },
        Err(errors) => errors,
    };

    Ok(invalid(controversy_form_page(
        "Change controversy",
        &action,
        &submission,
        &errors,
        Some(&delete),
    )))
}

/// POST /admin/controversies/:id/delete/
///
/// Refused with 409 while data points reference the controversy.
pub async fn controversy_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> PageResult<Response> {
    match delete_controversy(&state.db, id).await {
        Ok(()) => Ok(Redirect::to(CONTROVERSY_LIST).into_response()),
        Err(Error::Protected(message)) => {
            let (edit, _) = controversy_actions(id);
            Ok((StatusCode::CONFLICT, Html(protected_page(&message, &edit))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

fn controversy_actions(id: i64) -> (String, String) {
    (
        format!("/admin/controversies/{}/", id),
        format!("/admin/controversies/{}/delete/", id),
    )
}

/// Turn a slug collision into a field error; anything else propagates
fn slug_error(e: Error) -> PageResult<FormErrors> {
    let mut errors = FormErrors::default();
    match e {
        Error::Conflict(_) => errors.add("slug", "Controversy with this Slug already exists."),
        Error::InvalidInput(message) => errors.add("slug", message),
        other => return Err(other.into()),
    }
    Ok(errors)
}

// -----------------------------------------------------------------------------
// Data points
// -----------------------------------------------------------------------------

/// GET /admin/points/
pub async fn point_list(State(state): State<AppState>) -> PageResult<Html<String>> {
    let listing = list_all_data_points(&state.db).await?;
    Ok(Html(point_list_page(&listing)))
}

/// GET /admin/points/add/
pub async fn point_add_form(State(state): State<AppState>) -> PageResult<Html<String>> {
    let choices = list_controversies(&state.db).await?;
    Ok(Html(point_form_page(
        "Add data point",
        "/admin/points/add/",
        &DataPointSubmission::default(),
        &FormErrors::default(),
        &choices,
        None,
    )))
}

/// POST /admin/points/add/
pub async fn point_add(
    State(state): State<AppState>,
    Form(submission): Form<DataPointSubmission>,
) -> PageResult<Response> {
    let choices = list_controversies(&state.db).await?;

    match clean_admin_data_point(&submission, &choices) {
        Ok(new_point) => {
            create_data_point(&state.db, &new_point).await?;
            Ok(Redirect::to(POINT_LIST).into_response())
        }
        Err(errors) => {
            warn!("Rejected admin data point: {}", errors);
            Ok(invalid(point_form_page(
                "Add data point",
                "/admin/points/add/",
                &submission,
                &errors,
                &choices,
                None,
            )))
        }
    }
}

/// GET /admin/points/:id/
pub async fn point_edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> PageResult<Html<String>> {
    let point = get_data_point(&state.db, id).await?;
    let choices = list_controversies(&state.db).await?;
    let (action, delete) = point_actions(id);

    Ok(Html(point_form_page(
        "Change data point",
        &action,
        &DataPointSubmission::from(&point),
        &FormErrors::default(),
        &choices,
        Some(&delete),
    )))
}

/// POST /admin/points/:id/
pub async fn point_edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(submission): Form<DataPointSubmission>,
) -> PageResult<Response> {
    get_data_point(&state.db, id).await?;
    let choices = list_controversies(&state.db).await?;
    let (action, delete) = point_actions(id);

    match clean_admin_data_point(&submission, &choices) {
        Ok(changes) => {
            update_data_point(&state.db, id, &changes).await?;
            Ok(Redirect::to(POINT_LIST).into_response())
        }
        Err(errors) => {
            warn!("Rejected admin change to data point {}: {}", id, errors);
            Ok(invalid(point_form_page(
                "Change data point",
                &action,
                &submission,
                &errors,
                &choices,
                Some(&delete),
            )))
        }
    }
}

/// POST /admin/points/:id/delete/
pub async fn point_delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> PageResult<Redirect> {
    delete_data_point(&state.db, id).await?;
    Ok(Redirect::to(POINT_LIST))
}

fn point_actions(id: i64) -> (String, String) {
    (
        format!("/admin/points/{}/", id),
        format!("/admin/points/{}/delete/", id),
    )
}

fn invalid(html: String) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response()
}
