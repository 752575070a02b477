//! Parameters of a search API call, from the session state and its collaborators.

use std::rc::Rc;

use common::{
    search_params::{ParamValue, RequestParams},
    search_query::SearchState,
};

use crate::collaborators::{ChartCollaborator, ChartSearchParam};

/// What the bound collaborators add to a search.
#[derive(Default, Clone)]
pub struct SearchContributions {
    /// Facets clauses joined by AND.
    pub facets_filters: String,
    pub facets_names: Vec<String>,
    pub sort_parameters: Option<RequestParams>,
    pub sort_option_id: Option<String>,
    pub charts: Vec<Rc<dyn ChartCollaborator>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParams {
    /// Not pruned yet: null values are still there.
    pub params: RequestParams,
    /// Some params can't be expressed in a query string.
    pub needs_post: bool,
}

fn dedup_first_seen(names: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(name) {
            unique.push(name.clone());
        }
    }
    unique
}

fn chart_params(charts: &[Rc<dyn ChartCollaborator>], is_get_request: bool) -> Option<ParamValue> {
    if charts.is_empty() {
        return None;
    }
    let charts = charts
        .iter()
        .map(|chart| chart.search_param(is_get_request))
        .collect::<Vec<ChartSearchParam>>();
    if is_get_request {
        let tokens = charts.into_iter().map(ChartSearchParam::into_token).collect::<Vec<_>>();
        Some(ParamValue::Text(tokens.join(",")))
    } else {
        let specs = charts.into_iter().map(ChartSearchParam::into_json).collect::<Vec<_>>();
        Some(ParamValue::Structured(serde_json::Value::Array(specs)))
    }
}

pub fn build_params(state: &SearchState, contributions: &SearchContributions, page: Option<u32>) -> QueryParams {
    let mut needs_post = false;

    let query_parts = [state.query.as_str(), contributions.facets_filters.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();

    let mut params = RequestParams::new();
    params.insert("q", query_parts.join(" "));
    params.insert("boost_phrase", state.boost_phrase);
    params.insert("langs", state.languages.clone());
    params.insert("page_size", state.page_size.to_string());
    params.insert("index_id", state.index_id.clone());

    if let Some(sort_parameters) = &contributions.sort_parameters {
        needs_post = sort_parameters.has_structured_values();
        params.extend(sort_parameters.clone());
    }
    if let Some(page) = page {
        params.insert("page", page.to_string());
    }
    if !contributions.facets_names.is_empty() {
        params.insert("facets", dedup_first_seen(&contributions.facets_names));
    }
    if let Some(charts) = chart_params(&contributions.charts, !needs_post) {
        params.insert("charts", charts);
    }
    QueryParams { params, needs_post }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Scatter;

    impl ChartCollaborator for Scatter {
        fn search_param(&self, is_get_request: bool) -> ChartSearchParam {
            if is_get_request {
                ChartSearchParam::Token("x:y".to_string())
            } else {
                ChartSearchParam::Spec(json!({"chart_type": "ScatterChartType", "x": "x", "y": "y"}))
            }
        }
    }

    fn state(query: &str) -> SearchState {
        SearchState { query: query.to_string(), languages: vec!["en".to_string(), "fr".to_string()], ..SearchState::default() }
    }

    #[test]
    fn test_query_and_facets_are_joined() {
        let contributions = SearchContributions { facets_filters: "brand:a".to_string(), ..Default::default() };
        let built = build_params(&state("milk"), &contributions, Some(2));
        assert_eq!(built.params.get("q"), Some(&ParamValue::Text("milk brand:a".to_string())));
        assert_eq!(built.params.get("page"), Some(&ParamValue::Text("2".to_string())));
        assert!(!built.needs_post);

        let only_facets = build_params(&state(""), &contributions, None);
        assert_eq!(only_facets.params.get("q"), Some(&ParamValue::Text("brand:a".to_string())));
        assert!(!only_facets.params.contains_key("page"));

        let only_query = build_params(&state("milk"), &SearchContributions::default(), None);
        assert_eq!(only_query.params.get("q"), Some(&ParamValue::Text("milk".to_string())));
    }

    #[test]
    fn test_default_params() {
        let built = build_params(&state("milk"), &SearchContributions::default(), Some(1));
        assert_eq!(built.params.get("index_id"), Some(&ParamValue::Null));
        assert_eq!(built.params.get("boost_phrase"), Some(&ParamValue::Bool(false)));
        assert!(!built.params.contains_key("facets"));
        assert!(!built.params.contains_key("charts"));
        assert_eq!(
            built.params.to_query_string(),
            "langs=en%2Cfr&page=1&page_size=10&q=milk"
        );
    }

    #[test]
    fn test_facets_names_deduplicated() {
        let contributions = SearchContributions {
            facets_names: vec!["brands".to_string(), "labels".to_string(), "brands".to_string()],
            ..Default::default()
        };
        let built = build_params(&state(""), &contributions, None);
        assert_eq!(
            built.params.get("facets"),
            Some(&ParamValue::List(vec!["brands".to_string(), "labels".to_string()]))
        );
    }

    #[test]
    fn test_scalar_sort_stays_get() {
        let mut sort = RequestParams::new();
        sort.insert("sort_by", "-unique_scans_n");
        let contributions = SearchContributions {
            sort_parameters: Some(sort),
            charts: vec![Rc::new(Scatter), Rc::new(Scatter)],
            ..Default::default()
        };
        let built = build_params(&state("milk"), &contributions, None);
        assert!(!built.needs_post);
        assert_eq!(built.params.get("sort_by"), Some(&ParamValue::Text("-unique_scans_n".to_string())));
        assert_eq!(built.params.get("charts"), Some(&ParamValue::Text("x:y,x:y".to_string())));
    }

    #[test]
    fn test_structured_sort_needs_post() {
        let mut sort = RequestParams::new();
        sort.insert("sort_by", "personal_score");
        sort.insert("sort_params", ParamValue::from_json(json!({"preferences": {"nutriscore": 2}})));
        let contributions = SearchContributions {
            sort_parameters: Some(sort),
            charts: vec![Rc::new(Scatter)],
            ..Default::default()
        };
        let built = build_params(&state("milk"), &contributions, None);
        assert!(built.needs_post);
        assert_eq!(
            built.params.get("charts"),
            Some(&ParamValue::Structured(json!([{"chart_type": "ScatterChartType", "x": "x", "y": "y"}])))
        );
    }

    #[test]
    fn test_boost_phrase_serialized_only_when_true() {
        let mut boosted = state("milk");
        boosted.boost_phrase = true;
        let built = build_params(&boosted, &SearchContributions::default(), None);
        assert!(built.params.to_query_string().contains("boost_phrase=true"));

        let built = build_params(&state("milk"), &SearchContributions::default(), None);
        assert!(!built.params.to_query_string().contains("boost_phrase"));
    }
}
