//! harbor-analytics library - Housing market analytics service
//!
//! Read-only HTTP API over the externally provisioned market database
//! (location dimension + fact table). Resolves metric time series by
//! town/neighborhood and property type, with a raw-SQL fallback path
//! behind the primary query builder.

use axum::Router;
use sqlx::SqlitePool;

pub mod api;
pub mod catalog;
pub mod db;
pub mod error;
pub mod location;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Market database connection pool (read-only)
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/analytics/data", get(api::get_analytics_data))
        .route("/analytics/locations", get(api::get_available_locations))
        .route("/analytics/metrics", get(api::get_available_metrics))
        .merge(api::health_routes())
        .with_state(state)
}
