//! Observable state of a search session.

use std::sync::Arc;

use common::search_result::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// Published by the session after every change; subscribe with [`crate::session::SearchSession::signals`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSignals {
    pub phase: SearchPhase,
    pub is_query_changed: bool,
    pub is_facets_changed: bool,
    /// Drives the "search" button text.
    pub is_search_changed: bool,
    pub can_reset: bool,
    /// Last applied result; a failed search leaves it untouched.
    pub result: Option<Arc<SearchResult>>,
    /// Set by a failed search, cleared by the next applied one.
    pub last_error: Option<String>,
}

impl SessionSignals {
    pub fn is_search_loading(&self) -> bool {
        self.phase == SearchPhase::Loading
    }

    pub fn is_failed(&self) -> bool {
        self.last_error.is_some()
    }
}
