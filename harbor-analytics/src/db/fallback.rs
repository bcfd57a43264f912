//! Raw-SQL fallback path
//!
//! Independent re-implementation of the primary queries as hand-written SQL
//! statements, so a failure in query composition cannot take out both
//! paths. Semantics must stay identical to the primary path: same matching
//! rules, inclusive year bounds, NULL exclusion, and empty-result failure.
//!
//! Values are bound parameters here too; the metric column is the only
//! interpolated fragment and is always a catalog identifier.

use harbor_common::{Error, Result};
use sqlx::SqlitePool;

use super::timeseries::{no_data_message, point_from_row, TimeSeriesPoint, TimeSeriesQuery};

/// Fetch the time series for one location and metric via raw SQL.
pub async fn fetch_timeseries_sql(
    pool: &SqlitePool,
    query: &TimeSeriesQuery,
) -> Result<Vec<TimeSeriesPoint>> {
    let neighborhood_clause = if query.neighborhood.is_some() {
        "AND LOWER(d.neighborhood) = ? "
    } else {
        "AND (d.neighborhood IS NULL OR d.neighborhood = '') "
    };

    let sql = format!(
        "SELECT f.year, f.{column} \
         FROM fact_table f \
         JOIN location_dimension d ON f.location_id = d.location_id \
         WHERE LOWER(d.town) = ? \
         {neighborhood_clause}\
         AND LOWER(d.property_type) = ? \
         AND f.year BETWEEN ? AND ? \
         ORDER BY f.year",
        column = query.metric_column,
    );

    let mut q = sqlx::query(&sql).bind(&query.town);
    if let Some(neighborhood) = &query.neighborhood {
        q = q.bind(neighborhood);
    }
    let rows = q
        .bind(&query.property_type)
        .bind(query.start_year)
        .bind(query.end_year)
        .fetch_all(pool)
        .await?;

    let points: Vec<TimeSeriesPoint> = rows.iter().filter_map(point_from_row).collect();
    if points.is_empty() {
        return Err(Error::NotFound(no_data_message(query)));
    }
    Ok(points)
}
