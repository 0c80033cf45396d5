use serde::{Deserialize, Serialize};

/// Sentinel for a value the scrape could not resolve
pub const NA: &str = "NA";

/// One lookup target: a suburb within a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    #[serde(rename = "Suburb")]
    pub suburb: String,
    #[serde(rename = "Region")]
    pub region: String,
}

/// One output row, produced per Query
///
/// Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub suburb: String,
    pub region: String,
    pub median_estimate: String,
    pub period1: String,
    pub capital_growth: String,
    pub period2: String,
    pub chosen_area: String,
}

impl ResultRecord {
    /// Record for a query that matched nothing in the dropdown
    pub fn skipped(query: &Query) -> Self {
        Self {
            suburb: query.suburb.clone(),
            region: query.region.clone(),
            median_estimate: NA.to_string(),
            period1: NA.to_string(),
            capital_growth: NA.to_string(),
            period2: NA.to_string(),
            chosen_area: format!("{} - {}", NA, NA),
        }
    }
}
