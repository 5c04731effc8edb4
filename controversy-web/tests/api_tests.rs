//! Integration tests for controversy-web routes
//!
//! Each test builds the router over a fresh database in a temporary
//! directory and drives it with `oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

use controversy_common::db::{
    create_controversy, create_data_point, get_controversy_by_slug, init_database,
    list_controversies, list_data_points_for,
};
use controversy_common::{Category, Controversy, NewControversy, NewDataPoint};
use controversy_web::{build_router, AppState};

/// Test helper: fresh database plus router
async fn setup() -> (TempDir, SqlitePool, Router) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("controversy.db"))
        .await
        .expect("Should initialize database");
    let app = build_router(AppState::new(pool.clone()));
    (dir, pool, app)
}

async fn add_controversy(pool: &SqlitePool, name: &str, slug: &str) -> Controversy {
    create_controversy(
        pool,
        &NewControversy {
            name: name.to_string(),
            description: format!("About {}", name),
            slug: slug.to_string(),
        },
    )
    .await
    .expect("Should create controversy")
}

async fn add_point(pool: &SqlitePool, controversy_id: i64, name: &str, category: Category, boolean: bool) {
    create_data_point(
        pool,
        &NewDataPoint {
            controversy_id,
            name: name.to_string(),
            description: "desc".to_string(),
            url: format!("https://example.org/{}", name),
            category,
            boolean,
        },
    )
    .await
    .expect("Should create data point");
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
}

async fn body_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Should have Location header")
        .to_str()
        .unwrap()
}

// =============================================================================
// Index and detail
// =============================================================================

#[tokio::test]
async fn test_index_lists_controversies_by_name() {
    let (_dir, pool, app) = setup().await;
    add_controversy(&pool, "Vaccines", "vaccines").await;
    add_controversy(&pool, "Climate", "climate").await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response.into_body()).await;
    let climate = html.find(r#"href="/climate/""#).expect("climate link");
    let vaccines = html.find(r#"href="/vaccines/""#).expect("vaccines link");
    assert!(climate < vaccines, "controversies should be ordered by name");
}

#[tokio::test]
async fn test_detail_renders_three_charts() {
    let (_dir, pool, app) = setup().await;
    let climate = add_controversy(&pool, "Climate", "climate").await;
    add_point(&pool, climate.id, "temp-rise", Category::Data, true).await;
    add_point(&pool, climate.id, "sea-level", Category::Data, false).await;
    add_point(&pool, climate.id, "too-costly", Category::Opinion, false).await;

    let response = app.oneshot(get("/climate/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response.into_body()).await;
    assert!(html.contains(r#"id="chart-data""#));
    assert!(html.contains(r#"id="chart-opinion""#));
    assert!(html.contains(r#"id="chart-advice""#));
    assert!(html.contains("No advice points yet."));
    assert!(html.contains(">temp-rise</text>"));
    assert!(html.contains(r#"<select name="controversy" disabled>"#));
}

#[tokio::test]
async fn test_unknown_slug_is_404() {
    let (_dir, _pool, app) = setup().await;

    let response = app.oneshot(get("/nope/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_text(response.into_body()).await;
    assert!(html.contains("Not found"));
}

#[tokio::test]
async fn test_missing_trailing_slash_redirects() {
    let (_dir, pool, app) = setup().await;
    add_controversy(&pool, "Climate", "climate").await;

    let response = app.oneshot(get("/climate")).await.unwrap();

    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(location(&response), "/climate/");
}

// =============================================================================
// Add-data-point submission
// =============================================================================

#[tokio::test]
async fn test_valid_submission_creates_point_and_redirects() {
    let (_dir, pool, app) = setup().await;
    let climate = add_controversy(&pool, "Climate", "climate").await;

    let response = app
        .oneshot(post_form(
            "/climate/",
            "name=temp-rise&description=Warming&url=https%3A%2F%2Fexample.org&data_set=data&boolean=on",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/climate/");

    let points = list_data_points_for(&pool, climate.id).await.unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].name, "temp-rise");
    assert_eq!(points[0].url, "https://example.org");
    assert_eq!(points[0].category, Category::Data);
    assert!(points[0].boolean);
    assert_eq!(points[0].controversy_id, climate.id);
}

#[tokio::test]
async fn test_submitted_controversy_is_ignored() {
    let (_dir, pool, app) = setup().await;
    let climate = add_controversy(&pool, "Climate", "climate").await;
    let coffee = add_controversy(&pool, "Coffee", "coffee").await;

    let body = format!(
        "controversy={}&name=temp-rise&description=Warming&url=https%3A%2F%2Fexample.org&data_set=data&boolean=on",
        coffee.id
    );
    let response = app.oneshot(post_form("/climate/", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(list_data_points_for(&pool, climate.id).await.unwrap().len(), 1);
    assert!(list_data_points_for(&pool, coffee.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_submission_rerenders_with_errors() {
    let (_dir, pool, app) = setup().await;
    let climate = add_controversy(&pool, "Climate", "climate").await;

    let response = app
        .oneshot(post_form(
            "/climate/",
            "name=temp-rise&description=Warming&url=not-a-url&data_set=rumour",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response.into_body()).await;
    assert!(html.contains("Enter a valid URL."));
    assert!(html.contains("rumour is not one of the available choices"));
    assert!(html.contains(r#"value="temp-rise""#), "submitted values are kept");

    assert!(list_data_points_for(&pool, climate.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submission_to_unknown_slug_is_404() {
    let (_dir, _pool, app) = setup().await;

    let response = app
        .oneshot(post_form(
            "/nope/",
            "name=x&description=y&url=https%3A%2F%2Fexample.org&data_set=data",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Chart JSON
// =============================================================================

#[tokio::test]
async fn test_chart_json_angles() {
    let (_dir, pool, app) = setup().await;
    let climate = add_controversy(&pool, "Climate", "climate").await;
    for name in ["a", "b", "c", "d"] {
        add_point(&pool, climate.id, name, Category::Advice, name != "b").await;
    }

    let response = app.oneshot(get("/api/climate/charts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["slug"], "climate");

    let charts = body["charts"].as_array().unwrap();
    assert_eq!(charts.len(), 3);
    assert_eq!(charts[0]["category"], "data");
    assert_eq!(charts[0]["weight"], 100.0);
    assert!(charts[0]["wedges"].as_array().unwrap().is_empty());

    let advice = &charts[2];
    assert_eq!(advice["category"], "advice");
    assert_eq!(advice["weight"], 25.0);
    let wedges = advice["wedges"].as_array().unwrap();
    assert_eq!(wedges.len(), 4);
    assert_eq!(wedges[0]["name"], "a");
    assert_eq!(wedges[0]["start_angle"], 0.0);
    assert_eq!(wedges[1]["boolean"], false);
    // Final end angle wraps back to 0 rather than 2π
    assert_eq!(wedges[3]["end_angle"], 0.0);
    let quarter = std::f64::consts::FRAC_PI_2;
    assert!((wedges[1]["start_angle"].as_f64().unwrap() - quarter).abs() < 1e-9);
}

#[tokio::test]
async fn test_chart_json_unknown_slug() {
    let (_dir, _pool, app) = setup().await;

    let response = app.oneshot(get("/api/nope/charts")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Admin
// =============================================================================

#[tokio::test]
async fn test_admin_create_controversy_prepopulates_slug() {
    let (_dir, pool, app) = setup().await;

    let response = app
        .oneshot(post_form(
            "/admin/controversies/add/",
            "name=Climate+Change&description=Is+it+happening&slug=",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/controversies/");
    let created = get_controversy_by_slug(&pool, "climate-change").await.unwrap();
    assert_eq!(created.name, "Climate Change");
}

#[tokio::test]
async fn test_admin_duplicate_slug_is_field_error() {
    let (_dir, pool, app) = setup().await;
    add_controversy(&pool, "Climate", "climate").await;

    let response = app
        .oneshot(post_form(
            "/admin/controversies/add/",
            "name=Climate&description=Again&slug=climate",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response.into_body()).await;
    assert!(html.contains("Controversy with this Slug already exists."));
    assert_eq!(list_controversies(&pool).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_delete_referenced_controversy_refused() {
    let (_dir, pool, app) = setup().await;
    let climate = add_controversy(&pool, "Climate", "climate").await;
    add_point(&pool, climate.id, "temp-rise", Category::Data, true).await;

    let uri = format!("/admin/controversies/{}/delete/", climate.id);
    let response = app.oneshot(post_form(&uri, "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(get_controversy_by_slug(&pool, "climate").await.is_ok());
}

#[tokio::test]
async fn test_admin_delete_unreferenced_controversy() {
    let (_dir, pool, app) = setup().await;
    let climate = add_controversy(&pool, "Climate", "climate").await;

    let uri = format!("/admin/controversies/{}/delete/", climate.id);
    let response = app.oneshot(post_form(&uri, "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(list_controversies(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_point_list_shows_columns() {
    let (_dir, pool, app) = setup().await;
    let climate = add_controversy(&pool, "Climate", "climate").await;
    add_point(&pool, climate.id, "temp-rise", Category::Opinion, true).await;

    let response = app.oneshot(get("/admin/points/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response.into_body()).await;
    assert!(html.contains("<td>Climate</td>"));
    assert!(html.contains(">temp-rise</a>"));
    assert!(html.contains("<td>OPINION</td>"));
}

#[tokio::test]
async fn test_admin_point_can_choose_controversy() {
    let (_dir, pool, app) = setup().await;
    add_controversy(&pool, "Climate", "climate").await;
    let coffee = add_controversy(&pool, "Coffee", "coffee").await;

    let body = format!(
        "controversy={}&name=jitters&description=d&url=https%3A%2F%2Fexample.org&data_set=advice",
        coffee.id
    );
    let response = app.oneshot(post_form("/admin/points/add/", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let points = list_data_points_for(&pool, coffee.id).await.unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].category, Category::Advice);
    assert!(!points[0].boolean);
}

// =============================================================================
// Service endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, _pool, app) = setup().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "controversy-web");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn test_stylesheet_served() {
    let (_dir, _pool, app) = setup().await;

    let response = app.oneshot(get("/static/site.css")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
}
