//! Search API response schema and the result snapshot published to dependents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};


/// Body of a `/search` response, as returned by the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<serde_json::Value>,
    pub count: u64,
    pub is_count_exact: bool,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    #[serde(default)]
    pub facets: Option<BTreeMap<String, FacetAggregation>>,
    #[serde(default)]
    pub charts: Option<BTreeMap<String, serde_json::Value>>,
    /// Elapsed time on the server, in milliseconds.
    pub took: u64,
}

impl SearchResponse {
    pub fn from_json_str(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetAggregation {
    pub name: String,
    #[serde(default)]
    pub items: Vec<FacetItem>,
    #[serde(default)]
    pub count_error_margin: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetItem {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub selected: bool,
}


/// Outcome of a completed search, shared read-only by every dependent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub search_name: String,
    pub results: Vec<serde_json::Value>,
    pub count: u64,
    pub is_count_exact: bool,
    pub current_page: u32,
    pub page_count: u32,
    pub page_size: u32,
    pub facets: BTreeMap<String, FacetAggregation>,
    pub charts: BTreeMap<String, serde_json::Value>,
    pub display_time: u64,
}

impl SearchResult {
    pub fn from_response(search_name: impl Into<String>, response: SearchResponse) -> Self {
        Self {
            search_name: search_name.into(),
            results: response.hits,
            count: response.count,
            is_count_exact: response.is_count_exact,
            current_page: response.page,
            page_count: response.page_count,
            page_size: response.page_size,
            facets: response.facets.unwrap_or_default(),
            charts: response.charts.unwrap_or_default(),
            display_time: response.took,
        }
    }
}
