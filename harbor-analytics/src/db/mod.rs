//! Database access layer for harbor-analytics
//!
//! The location dimension and fact table are owned by the data collaborator;
//! this service only reads them, so all connections are opened read-only.
//!
//! Every fetch has two independent access paths: the query-builder path in
//! [`timeseries`]/[`locations`] and the raw-SQL path in [`fallback`]. The
//! orchestrators here try the primary path and switch to raw SQL on any
//! failure, without discriminating by error kind.

use harbor_common::{Error, Result};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{error, warn};

pub mod fallback;
pub mod locations;
pub mod timeseries;

pub use timeseries::{TimeSeriesPoint, TimeSeriesQuery};

/// Connect to the market database in read-only mode.
///
/// Safety: SQLite mode=ro prevents any write operations.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::Config(format!(
            "Market database not found: {}\nThe database file is provisioned by the data pipeline; point HARBOR_DATABASE at it.",
            db_path.display()
        )));
    }

    let db_url = format!("sqlite://{}?mode=ro", db_path.display());

    let pool = SqlitePool::connect(&db_url).await?;

    // Verify read-only by attempting a write (should fail)
    #[cfg(debug_assertions)]
    {
        let write_test = sqlx::query("CREATE TABLE _test_write (id INTEGER)")
            .execute(&pool)
            .await;
        if write_test.is_ok() {
            panic!("SAFETY VIOLATION: Database connection is not read-only!");
        }
    }

    Ok(pool)
}

/// Fetch a metric time series, trying the query-builder path first and the
/// raw-SQL path on any primary failure.
///
/// Both paths' failures are logged with full context; only the fallback's
/// error reaches the caller.
pub async fn fetch_with_fallback(
    pool: &SqlitePool,
    query: &TimeSeriesQuery,
) -> Result<Vec<TimeSeriesPoint>> {
    match timeseries::fetch_timeseries(pool, query).await {
        Ok(points) => Ok(points),
        Err(primary) => {
            warn!(
                "Primary time-series query failed for {} ({}) {}-{}: {primary}. Retrying via raw SQL.",
                query.town, query.property_type, query.start_year, query.end_year
            );
            fallback::fetch_timeseries_sql(pool, query).await.map_err(|e| {
                error!(
                    "Raw-SQL time-series query failed for {} ({}) {}-{}: {e}",
                    query.town, query.property_type, query.start_year, query.end_year
                );
                e
            })
        }
    }
}

/// List available locations for a property-type code, with the same
/// try-primary / raw-SQL-fallback composition as the time-series fetch.
pub async fn locations_with_fallback(
    pool: &SqlitePool,
    property_type: &str,
) -> Result<Vec<String>> {
    match locations::list_locations(pool, property_type).await {
        Ok(list) => Ok(list),
        Err(primary) => {
            warn!(
                "Primary locations query failed for property type {property_type}: {primary}. Retrying via raw SQL."
            );
            locations::list_locations_sql(pool, property_type)
                .await
                .map_err(|e| {
                    error!("Raw-SQL locations query failed for property type {property_type}: {e}");
                    e
                })
        }
    }
}
