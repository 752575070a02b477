//! Shared search state models and helpers.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::search_const::{DEFAULT_LANGS, DEFAULT_PAGE_SIZE, PROPERTY_LIST_DIVIDER};

/// Selected terms, per facet identifier.
pub type SelectedTermsByFacet = BTreeMap<String, BTreeSet<String>>;


/// In-progress search of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchState {
    pub query: String,
    /// Selection of the last search sent, or restored from the address bar.
    /// `None` until one of those happened, which is not the same as cleared.
    pub selected_terms_by_facet: Option<SelectedTermsByFacet>,
    pub sort_option_id: Option<String>,
    pub current_page: Option<u32>,
    pub page_size: u32,
    pub page_count: Option<u32>,
    pub index_id: Option<String>,
    /// The first language is the main one.
    pub languages: Vec<String>,
    pub boost_phrase: bool,
    pub last_executed_query: String,
    pub last_executed_facets_expression: String,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            selected_terms_by_facet: None,
            sort_option_id: None,
            current_page: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_count: None,
            index_id: None,
            languages: split_languages(DEFAULT_LANGS),
            boost_phrase: false,
            last_executed_query: String::new(),
            last_executed_facets_expression: String::new(),
        }
    }
}

impl SearchState {
    pub fn is_query_changed(&self) -> bool {
        self.query != self.last_executed_query
    }

    pub fn is_facets_changed(&self, facets_expression: &str) -> bool {
        facets_expression != self.last_executed_facets_expression
    }

    pub fn is_search_changed(&self, facets_expression: &str) -> bool {
        self.is_query_changed() || self.is_facets_changed(facets_expression)
    }

    /// Query or facets hold something worth resetting.
    pub fn can_reset(&self, facets_expression: &str) -> bool {
        let query_resettable = !self.query.is_empty() || self.is_query_changed();
        let facets_resettable = !facets_expression.is_empty() || self.is_facets_changed(facets_expression);
        query_resettable || facets_resettable
    }

    /// Remember what is about to be sent, so that later edits can be detected.
    pub fn snapshot_executed(&mut self, facets_expression: &str) {
        self.last_executed_query = self.query.clone();
        self.last_executed_facets_expression = facets_expression.to_string();
    }
}

/// Split a `;` separated languages property, trimming every entry.
pub fn split_languages(langs: &str) -> Vec<String> {
    langs
        .split(PROPERTY_LIST_DIVIDER)
        .map(|lang| lang.trim().to_string())
        .filter(|lang| !lang.is_empty())
        .collect()
}
