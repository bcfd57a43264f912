//! Location strings
//!
//! A location identifies a query scope: a whole town, or a `town/neighborhood`
//! sub-area. Parsing normalizes but never validates; unknown locations only
//! surface at query time as empty results.

/// Parsed location: a town with an optional neighborhood
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub town: String,
    pub neighborhood: Option<String>,
}

impl Location {
    /// Parse a free-form location string.
    ///
    /// Splits on the first `/` into town and neighborhood, lowercasing and
    /// trimming both. A neighborhood that trims to empty counts as absent,
    /// so `"boston/"` selects town-level data just like `"boston"`.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('/') {
            Some((town, neighborhood)) => {
                let neighborhood = neighborhood.trim().to_lowercase();
                Self {
                    town: town.trim().to_lowercase(),
                    neighborhood: (!neighborhood.is_empty()).then_some(neighborhood),
                }
            }
            None => Self {
                town: raw.trim().to_lowercase(),
                neighborhood: None,
            },
        }
    }

    /// Combined `town/neighborhood` label, or just the town
    pub fn label(&self) -> String {
        match &self.neighborhood {
            Some(neighborhood) => format!("{}/{}", self.town, neighborhood),
            None => self.town.clone(),
        }
    }
}
