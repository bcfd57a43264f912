//! Available-locations queries
//!
//! Primary path selects the raw `(town, neighborhood)` rows and formats the
//! combined labels in Rust; the fallback path pushes the formatting into a
//! single SQL CASE projection. Rows with a blank neighborhood label as the
//! bare town (town-level aggregation rows).

use harbor_common::{Error, Result};
use sqlx::{Row, SqlitePool};

/// List `town` / `town/neighborhood` labels for a property-type code, sorted.
pub async fn list_locations(pool: &SqlitePool, property_type: &str) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT town, neighborhood FROM location_dimension WHERE LOWER(property_type) = ?",
    )
    .bind(property_type)
    .fetch_all(pool)
    .await?;

    let mut locations: Vec<String> = rows
        .iter()
        .filter_map(|row| {
            let town: Option<String> = row.try_get(0).ok().flatten();
            let neighborhood: Option<String> = row.try_get(1).ok().flatten();
            let town = town?;
            Some(match neighborhood {
                Some(n) if !n.trim().is_empty() => format!("{town}/{n}"),
                _ => town,
            })
        })
        .collect();

    if locations.is_empty() {
        return Err(Error::NotFound(no_locations_message(property_type)));
    }

    locations.sort();
    Ok(locations)
}

/// Raw-SQL rendition of [`list_locations`] with identical output.
pub async fn list_locations_sql(pool: &SqlitePool, property_type: &str) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT DISTINCT \
             CASE \
                 WHEN neighborhood IS NULL OR TRIM(neighborhood) = '' THEN town \
                 ELSE town || '/' || neighborhood \
             END AS location \
         FROM location_dimension \
         WHERE LOWER(property_type) = ? \
         ORDER BY location",
    )
    .bind(property_type)
    .fetch_all(pool)
    .await?;

    let locations: Vec<String> = rows
        .iter()
        .filter_map(|row| row.try_get::<Option<String>, _>(0).ok().flatten())
        .collect();

    if locations.is_empty() {
        return Err(Error::NotFound(no_locations_message(property_type)));
    }

    Ok(locations)
}

fn no_locations_message(property_type: &str) -> String {
    format!("No locations found for property type: {property_type}")
}
