//! Metric discovery endpoint

use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog;

/// Description and unit for one metric
#[derive(Debug, Serialize)]
pub struct MetricInfo {
    pub description: String,
    pub unit: String,
}

/// GET /analytics/metrics
///
/// Returns every catalog metric with a derived human-readable description.
pub async fn get_available_metrics() -> Json<BTreeMap<String, MetricInfo>> {
    let metrics = catalog::METRICS
        .iter()
        .map(|metric| {
            (
                metric.name.to_string(),
                MetricInfo {
                    description: catalog::describe(metric.name),
                    unit: metric.unit.to_string(),
                },
            )
        })
        .collect();

    Json(metrics)
}
