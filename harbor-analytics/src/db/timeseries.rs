//! Primary time-series query path
//!
//! Composes the fact/dimension join with `sqlx::QueryBuilder`. Every
//! request-supplied value is a bound parameter; the only fragment ever
//! interpolated into query text is the metric column identifier, which
//! comes exclusively from the fixed catalog.

use harbor_common::{Error, Result};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::location::Location;

/// One (year, value) observation of a metric series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub year: i64,
    pub value: f64,
}

/// Filter set shared by both access paths.
///
/// Town, neighborhood, and property type are already lowercased by the
/// location parser and property-type normalizer; the queries lowercase the
/// stored side as well so storage case can never break matching.
#[derive(Debug, Clone)]
pub struct TimeSeriesQuery {
    pub property_type: String,
    pub town: String,
    pub neighborhood: Option<String>,
    pub start_year: i64,
    pub end_year: i64,
    pub metric_column: &'static str,
}

impl TimeSeriesQuery {
    pub fn new(
        property_type: &str,
        location: &Location,
        start_year: i64,
        end_year: i64,
        metric_column: &'static str,
    ) -> Self {
        Self {
            property_type: property_type.to_string(),
            town: location.town.clone(),
            neighborhood: location.neighborhood.clone(),
            start_year,
            end_year,
            metric_column,
        }
    }
}

/// Fetch the time series for one location and metric.
///
/// Returns points ascending by year with NULL metric values dropped, or
/// `NotFound` when nothing remains. No synthetic data is ever substituted.
pub async fn fetch_timeseries(
    pool: &SqlitePool,
    query: &TimeSeriesQuery,
) -> Result<Vec<TimeSeriesPoint>> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT f.year, f.");
    builder.push(query.metric_column);
    builder.push(
        " FROM fact_table f \
         JOIN location_dimension d ON d.location_id = f.location_id \
         WHERE LOWER(d.property_type) = ",
    );
    builder.push_bind(&query.property_type);
    builder.push(" AND LOWER(d.town) = ");
    builder.push_bind(&query.town);
    match &query.neighborhood {
        Some(neighborhood) => {
            builder.push(" AND LOWER(d.neighborhood) = ");
            builder.push_bind(neighborhood);
        }
        // No neighborhood requested: town-level rows only, never sub-areas
        None => {
            builder.push(" AND (d.neighborhood IS NULL OR d.neighborhood = '')");
        }
    }
    builder.push(" AND f.year >= ");
    builder.push_bind(query.start_year);
    builder.push(" AND f.year <= ");
    builder.push_bind(query.end_year);
    builder.push(" ORDER BY f.year");

    let rows = builder.build().fetch_all(pool).await?;

    let points: Vec<TimeSeriesPoint> = rows.iter().filter_map(point_from_row).collect();
    if points.is_empty() {
        return Err(Error::NotFound(no_data_message(query)));
    }
    Ok(points)
}

/// Convert a `(year, value)` row, skipping NULL values.
///
/// Metric columns are a mix of INTEGER and REAL storage; try the float read
/// first and fall back to integer.
pub(crate) fn point_from_row(row: &SqliteRow) -> Option<TimeSeriesPoint> {
    let year: i64 = row.try_get(0).ok()?;
    let value = row
        .try_get::<Option<f64>, _>(1)
        .ok()
        .flatten()
        .or_else(|| {
            row.try_get::<Option<i64>, _>(1)
                .ok()
                .flatten()
                .map(|v| v as f64)
        })?;
    Some(TimeSeriesPoint { year, value })
}

pub(crate) fn no_data_message(query: &TimeSeriesQuery) -> String {
    format!(
        "No data found for {} ({}) from {} to {}",
        query.town, query.property_type, query.start_year, query.end_year
    )
}
