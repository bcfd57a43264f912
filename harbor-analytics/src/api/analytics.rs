//! Analytics data endpoint
//!
//! Resolves a metric time series for a primary location, optionally
//! alongside comparison locations. Input validation happens up front, before
//! any storage access; storage failures on the primary path trigger the
//! raw-SQL fallback inside the db layer.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::catalog;
use crate::db::{self, TimeSeriesPoint, TimeSeriesQuery};
use crate::error::{ApiError, ApiResult};
use crate::location::Location;
use crate::AppState;

/// Earliest year with market data
pub const MIN_YEAR: i64 = 1995;
/// Latest year with market data
pub const MAX_YEAR: i64 = 2025;

/// Query parameters for the analytics data endpoint
#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    /// Property type: condos, multifamily, singlefamily
    pub housing_type: String,
    /// Location (town or town/neighborhood)
    pub location: String,
    pub start_year: i64,
    pub end_year: i64,
    /// Metric to analyze (see /analytics/metrics)
    pub metric: String,
    /// Optional comma-separated list of locations to compare
    pub compare_locations: Option<String>,
}

/// Time series for one location
#[derive(Debug, Serialize)]
pub struct TimeSeriesData {
    pub location: String,
    pub metric: String,
    pub unit: String,
    pub data: Vec<TimeSeriesPoint>,
}

/// Response envelope: primary series, comparison series, request metadata
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub primary: TimeSeriesData,
    pub comparisons: Vec<TimeSeriesData>,
    pub metadata: HashMap<String, String>,
}

/// GET /analytics/data
///
/// Per-comparison-location failures are absorbed: the location is dropped
/// from the comparisons list and the request still succeeds.
pub async fn get_analytics_data(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> ApiResult<Json<AnalyticsResponse>> {
    if params.start_year >= params.end_year {
        return Err(ApiError::BadRequest(
            "start_year must be less than end_year".to_string(),
        ));
    }
    for year in [params.start_year, params.end_year] {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ApiError::BadRequest(format!(
                "year {year} out of range ({MIN_YEAR}-{MAX_YEAR})"
            )));
        }
    }
    let metric = catalog::resolve_metric(&params.metric)?;
    let property_type = catalog::property_type_code(&params.housing_type);

    info!(
        "Analytics request: housing_type={}, location={}, metric={}, years={}-{}, compare_locations={:?}",
        params.housing_type,
        params.location,
        params.metric,
        params.start_year,
        params.end_year,
        params.compare_locations
    );

    let primary_location = Location::parse(&params.location);
    let query = TimeSeriesQuery::new(
        &property_type,
        &primary_location,
        params.start_year,
        params.end_year,
        metric.column,
    );
    let primary_points = db::fetch_with_fallback(&state.db, &query).await?;

    let mut response = AnalyticsResponse {
        primary: series(&primary_location, metric.name, metric.unit, primary_points),
        comparisons: Vec::new(),
        metadata: HashMap::from([("housing_type".to_string(), params.housing_type.clone())]),
    };

    if let Some(compare) = &params.compare_locations {
        for raw in compare.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let location = Location::parse(raw);
            let compare_query = TimeSeriesQuery::new(
                &property_type,
                &location,
                params.start_year,
                params.end_year,
                metric.column,
            );
            match db::fetch_with_fallback(&state.db, &compare_query).await {
                Ok(points) => response
                    .comparisons
                    .push(series(&location, metric.name, metric.unit, points)),
                Err(e) => {
                    warn!("Failed to get comparison data for {raw}: {e}");
                }
            }
        }
    }

    Ok(Json(response))
}

fn series(
    location: &Location,
    metric: &str,
    unit: &str,
    data: Vec<TimeSeriesPoint>,
) -> TimeSeriesData {
    TimeSeriesData {
        location: location.label(),
        metric: metric.to_string(),
        unit: unit.to_string(),
        data,
    }
}
