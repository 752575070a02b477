//! Search url, method, params and history entry of the next search.

use common::{
    search_params::ParamValue,
    search_query::SearchState,
    transport::{HttpMethod, SearchRequest},
};

use crate::{
    api::query_params::{QueryParams, SearchContributions, build_params},
    data_definitions::session_config::SessionConfig,
    history::{self, HistoryParams, HistoryState},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchUrl {
    pub request: SearchRequest,
    /// Address-bar entry matching the request.
    pub history: HistoryParams,
}

fn history_state(state: &SearchState, contributions: &SearchContributions, query_params: &QueryParams) -> HistoryState {
    let page = match query_params.params.get("page") {
        Some(ParamValue::Text(page)) => page.parse().ok(),
        _ => None,
    };
    HistoryState {
        query: Some(state.query.clone()),
        sort_option_id: contributions.sort_option_id.clone(),
        facets_filters: Some(contributions.facets_filters.clone()),
        page,
    }
}

pub fn search_url(config: &SessionConfig, state: &SearchState, contributions: &SearchContributions, page: Option<u32>) -> SearchUrl {
    let query_params = build_params(state, contributions, page);
    // history is taken before empty values are removed, so that it sees every param
    let history = history::encode(&history_state(state, contributions, &query_params), &config.name);
    let QueryParams { mut params, needs_post } = query_params;
    params.remove_empty();
    SearchUrl {
        request: SearchRequest {
            search_url: config.search_url(),
            method: if needs_post { HttpMethod::Post } else { HttpMethod::Get },
            params,
        },
        history,
    }
}
