//! HTTP API handlers for harbor-analytics

pub mod analytics;
pub mod health;
pub mod locations;
pub mod metrics;

pub use analytics::get_analytics_data;
pub use health::health_routes;
pub use locations::get_available_locations;
pub use metrics::get_available_metrics;
