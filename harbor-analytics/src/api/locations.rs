//! Available-locations endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::db;
use crate::error::ApiResult;
use crate::AppState;

/// Query parameters for the locations endpoint
#[derive(Debug, Deserialize)]
pub struct LocationsParams {
    /// Property type: condos, multifamily, singlefamily
    pub housing_type: String,
}

/// Sorted location labels available for a property type
#[derive(Debug, Serialize)]
pub struct AvailableLocationsResponse {
    pub locations: Vec<String>,
}

/// GET /analytics/locations
pub async fn get_available_locations(
    State(state): State<AppState>,
    Query(params): Query<LocationsParams>,
) -> ApiResult<Json<AvailableLocationsResponse>> {
    let property_type = catalog::property_type_code(&params.housing_type);
    let locations = db::locations_with_fallback(&state.db, &property_type).await?;
    Ok(Json(AvailableLocationsResponse { locations }))
}
