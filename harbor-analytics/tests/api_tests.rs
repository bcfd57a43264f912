//! Integration tests for the harbor-analytics API endpoints
//!
//! Tests drive the real router with an in-memory market database seeded to
//! cover the interesting shapes: town-level vs. neighborhood rows, NULL
//! metric values, facts outside the requested year range, and a property
//! type with no rows at all.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

use harbor_analytics::{build_router, AppState};

/// Test helper: in-memory market database with dimension + fact rows
async fn setup_test_db() -> SqlitePool {
    // Single connection: each new connection to :memory: would be a fresh,
    // empty database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");

    sqlx::query(
        "CREATE TABLE location_dimension (
             location_id INTEGER PRIMARY KEY,
             property_type TEXT,
             town TEXT,
             neighborhood TEXT
         )",
    )
    .execute(&pool)
    .await
    .expect("Should create location_dimension");

    sqlx::query(
        "CREATE TABLE fact_table (
             fact_id INTEGER PRIMARY KEY,
             location_id INTEGER REFERENCES location_dimension(location_id),
             year INTEGER,
             total_listings INTEGER,
             avg_days_on_market INTEGER,
             avg_days_to_offer INTEGER,
             average_sale_price INTEGER,
             average_list_price INTEGER,
             sp_lp_ratio REAL,
             average_orig_price INTEGER,
             sp_op_ratio REAL,
             lowest_price REAL,
             highest_price REAL,
             median_price REAL,
             total_market_volume REAL
         )",
    )
    .execute(&pool)
    .await
    .expect("Should create fact_table");

    sqlx::query(
        "INSERT INTO location_dimension (location_id, property_type, town, neighborhood) VALUES
             (1, 'cc', 'boston', NULL),
             (2, 'cc', 'boston', 'back bay'),
             (3, 'cc', 'somerville', ''),
             (4, 'sf', 'cambridge', NULL)",
    )
    .execute(&pool)
    .await
    .expect("Should seed location_dimension");

    sqlx::query(
        "INSERT INTO fact_table (fact_id, location_id, year, median_price, total_listings) VALUES
             (1, 1, 2020, 500000, 120),
             (2, 1, 2021, NULL, NULL),
             (3, 1, 2022, 520000, 140),
             (4, 1, 2019, 490000, 110),
             (5, 1, 2023, 530000, 150),
             (6, 2, 2020, 800000, 30),
             (7, 2, 2022, 850000, 35),
             (8, 3, 2020, 450000, 80),
             (9, 3, 2021, 470000, 85),
             (10, 3, 2022, 480000, 90),
             (11, 4, 2020, 700000, 60),
             (12, 4, 2022, 720000, 65)",
    )
    .execute(&pool)
    .await
    .expect("Should seed fact_table");

    pool
}

/// Test helper: Create app with test state
fn setup_app(db: SqlitePool) -> axum::Router {
    let state = AppState::new(db);
    build_router(state)
}

/// Test helper: Create request
fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn years_of(series: &Value) -> Vec<i64> {
    series["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|point| point["year"].as_i64().unwrap())
        .collect()
}

fn values_of(series: &Value) -> Vec<f64> {
    series["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|point| point["value"].as_f64().unwrap())
        .collect()
}

// =============================================================================
// Health Endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(setup_test_db().await);

    let response = app.oneshot(test_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "harbor-analytics");
    assert!(body["version"].is_string());
}

// =============================================================================
// Analytics Data
// =============================================================================

#[tokio::test]
async fn test_data_basic_series() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston&start_year=2020&end_year=2022&metric=median_price",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["primary"]["location"], "boston");
    assert_eq!(body["primary"]["metric"], "median_price");
    assert_eq!(body["primary"]["unit"], "dollars");
    assert_eq!(body["metadata"]["housing_type"], "condos");

    // 2021 has a NULL value and is omitted; 2019/2023 are outside the range
    assert_eq!(years_of(&body["primary"]), vec![2020, 2022]);
    assert_eq!(values_of(&body["primary"]), vec![500000.0, 520000.0]);
}

#[tokio::test]
async fn test_data_is_sorted_ascending_without_duplicate_years() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=somerville&start_year=2020&end_year=2022&metric=median_price",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let years = years_of(&body["primary"]);
    assert_eq!(years, vec![2020, 2021, 2022]);
    for pair in years.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[tokio::test]
async fn test_town_level_query_never_returns_neighborhood_facts() {
    let app = setup_app(setup_test_db().await);

    // boston has both a town-level row and a back bay row; the back bay
    // prices (800000/850000) must never leak into the town-level series
    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston&start_year=2020&end_year=2022&metric=median_price",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(values_of(&body["primary"]), vec![500000.0, 520000.0]);
}

#[tokio::test]
async fn test_neighborhood_query() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston/back%20bay&start_year=2020&end_year=2022&metric=median_price",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["primary"]["location"], "boston/back bay");
    assert_eq!(values_of(&body["primary"]), vec![800000.0, 850000.0]);
}

#[tokio::test]
async fn test_integer_metric_column() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston&start_year=2020&end_year=2022&metric=total_listings",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["primary"]["unit"], "listings");
    assert_eq!(values_of(&body["primary"]), vec![120.0, 140.0]);
}

#[tokio::test]
async fn test_inputs_are_case_insensitive() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=CONDOS&location=Boston&start_year=2020&end_year=2022&metric=median_price",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["primary"]["location"], "boston");
    assert_eq!(values_of(&body["primary"]), vec![500000.0, 520000.0]);
}

#[tokio::test]
async fn test_inverted_year_range_is_rejected() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston&start_year=2022&end_year=2020&metric=median_price",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("start_year"));
}

#[tokio::test]
async fn test_equal_years_are_rejected() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston&start_year=2020&end_year=2020&metric=median_price",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_out_of_range_year_is_rejected() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston&start_year=1800&end_year=2022&metric=median_price",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_metric_is_rejected() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston&start_year=2020&end_year=2022&metric=made_up",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Invalid metric"));
}

#[tokio::test]
async fn test_unknown_location_is_not_found() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=springfield&start_year=2020&end_year=2022&metric=median_price",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("springfield"));
    assert!(message.contains("cc"));
    assert!(message.contains("2020"));
    assert!(message.contains("2022"));
}

#[tokio::test]
async fn test_failed_comparison_location_is_omitted() {
    let app = setup_app(setup_test_db().await);

    // cambridge has no condo rows; somerville does. The request still
    // succeeds with the primary data intact and one comparison series.
    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston&start_year=2020&end_year=2022&metric=median_price&compare_locations=cambridge,somerville",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(values_of(&body["primary"]), vec![500000.0, 520000.0]);

    let comparisons = body["comparisons"].as_array().unwrap();
    assert_eq!(comparisons.len(), 1);
    assert_eq!(comparisons[0]["location"], "somerville");
    assert_eq!(values_of(&comparisons[0]), vec![450000.0, 470000.0, 480000.0]);
}

#[tokio::test]
async fn test_comparison_locations_are_trimmed() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request(
            "/analytics/data?housing_type=condos&location=boston&start_year=2020&end_year=2022&metric=median_price&compare_locations=%20somerville%20,",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let comparisons = body["comparisons"].as_array().unwrap();
    assert_eq!(comparisons.len(), 1);
    assert_eq!(comparisons[0]["location"], "somerville");
}

// =============================================================================
// Available Locations
// =============================================================================

#[tokio::test]
async fn test_locations_listing_is_sorted() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request("/analytics/locations?housing_type=condos"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let locations: Vec<&str> = body["locations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l.as_str().unwrap())
        .collect();

    // somerville's dimension row has an empty-string neighborhood and labels
    // as the bare town
    assert_eq!(locations, vec!["boston", "boston/back bay", "somerville"]);
}

#[tokio::test]
async fn test_locations_unknown_type_is_not_found() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request("/analytics/locations?housing_type=multifamily"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("No locations found"));
}

// =============================================================================
// Metric Catalog
// =============================================================================

#[tokio::test]
async fn test_metrics_listing() {
    let app = setup_app(setup_test_db().await);

    let response = app
        .oneshot(test_request("/analytics/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let metrics = body.as_object().unwrap();
    assert_eq!(metrics.len(), 12);

    assert_eq!(body["median_price"]["description"], "Median Price");
    assert_eq!(body["median_price"]["unit"], "dollars");
    assert_eq!(body["avg_days_on_market"]["unit"], "days");
    assert_eq!(body["sp_lp_ratio"]["unit"], "ratio");
}
