//! Fixed metric and property-type tables
//!
//! Both mappings are closed enumerations. The metric table doubles as the
//! whitelist of column identifiers that may ever appear in query text; the
//! property-type table maps user-facing housing labels to the short codes
//! stored in the location dimension.

use harbor_common::{Error, Result};

/// One entry of the metric catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metric {
    pub name: &'static str,
    pub column: &'static str,
    pub unit: &'static str,
}

const fn metric(name: &'static str, column: &'static str, unit: &'static str) -> Metric {
    Metric { name, column, unit }
}

/// The full metric catalog, in display order
pub const METRICS: [Metric; 12] = [
    metric("total_listings", "total_listings", "listings"),
    metric("avg_days_on_market", "avg_days_on_market", "days"),
    metric("avg_days_to_offer", "avg_days_to_offer", "days"),
    metric("average_sale_price", "average_sale_price", "dollars"),
    metric("average_list_price", "average_list_price", "dollars"),
    metric("sp_lp_ratio", "sp_lp_ratio", "ratio"),
    metric("average_orig_price", "average_orig_price", "dollars"),
    metric("sp_op_ratio", "sp_op_ratio", "ratio"),
    metric("lowest_price", "lowest_price", "dollars"),
    metric("highest_price", "highest_price", "dollars"),
    metric("median_price", "median_price", "dollars"),
    metric("total_market_volume", "total_market_volume", "dollars"),
];

/// Housing-type label to property-type code
const PROPERTY_TYPES: [(&str, &str); 3] = [
    ("condos", "cc"),
    ("multifamily", "mf"),
    ("singlefamily", "sf"),
];

/// Look up a metric by name
pub fn resolve_metric(name: &str) -> Result<&'static Metric> {
    METRICS
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| Error::InvalidInput(format!("Invalid metric: {name}")))
}

/// Map a housing-type label to its property-type code.
///
/// Lookup is case-insensitive; unknown labels pass through lowercased so
/// callers can query by raw code as well.
pub fn property_type_code(label: &str) -> String {
    let label = label.to_lowercase();
    PROPERTY_TYPES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, code)| (*code).to_string())
        .unwrap_or(label)
}

/// Human-readable metric description: title-cased name with underscores
/// replaced by spaces (`median_price` -> `Median Price`)
pub fn describe(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
