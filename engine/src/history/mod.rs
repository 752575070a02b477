//! Conversion between the search state and address-bar parameters.
//!
//! Every session owns a namespace of the address bar: its keys are prefixed
//! by `<name>.` unless it is the default search. Decoding only ever looks at
//! the keys of its own namespace.

pub mod facets_expression;

use std::collections::BTreeMap;

use common::search_query::SelectedTermsByFacet;

use crate::data_definitions::url_param::{add_param_prefixes, remove_param_prefixes, unprefixed_key};

/// Flat address-bar representation, keys already prefixed.
pub type HistoryParams = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HistorySearchParam {
    Query,
    SortBy,
    FacetsFilters,
    Page,
}

impl HistorySearchParam {
    pub const ALL: [HistorySearchParam; 4] = [Self::Query, Self::SortBy, Self::FacetsFilters, Self::Page];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "q",
            Self::SortBy => "sort_by",
            Self::FacetsFilters => "facetsFilters",
            Self::Page => "page",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.as_str() == key)
    }
}


/// What the session writes in the address bar.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryState {
    pub query: Option<String>,
    pub sort_option_id: Option<String>,
    /// Facet filter expression, as built by the facets collaborators.
    pub facets_filters: Option<String>,
    pub page: Option<u32>,
}

impl HistoryState {
    pub fn with_selected_terms(mut self, selected: &SelectedTermsByFacet) -> Self {
        self.facets_filters = Some(facets_expression::build_facets_filters(selected));
        self
    }
}

/// Values recovered from the address bar.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryValues {
    pub query: Option<String>,
    pub sort_option_id: Option<String>,
    pub selected_terms_by_facet: Option<SelectedTermsByFacet>,
    pub page: Option<u32>,
    /// Every param of the session, unprefixed and untouched.
    pub history: BTreeMap<String, String>,
}

impl HistoryValues {
    /// Whether a recognized search param was present at all.
    pub fn has_search_params(&self) -> bool {
        self.history.keys().any(|key| HistorySearchParam::from_key(key).is_some())
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = (&String, &String)> {
        self.history
            .iter()
            .filter(|(key, _)| HistorySearchParam::from_key(key).is_none())
    }
}


type HistoryParser = fn(&BTreeMap<String, String>, &mut HistoryValues);

/// One parser per recognized param; a missing or malformed param leaves the values untouched.
const HISTORY_PARSERS: [(HistorySearchParam, HistoryParser); 4] = [
    (HistorySearchParam::Page, parse_page),
    (HistorySearchParam::Query, parse_query),
    (HistorySearchParam::SortBy, parse_sort_by),
    (HistorySearchParam::FacetsFilters, parse_facets_filters),
];

fn parse_page(history: &BTreeMap<String, String>, values: &mut HistoryValues) {
    let Some(page) = history.get(HistorySearchParam::Page.as_str()) else { return };
    match page.trim().parse::<u32>() {
        Ok(page) if page >= 1 => values.page = Some(page),
        _ => tracing::debug!(page = page.as_str(), "ignoring invalid page in history"),
    }
}

fn parse_query(history: &BTreeMap<String, String>, values: &mut HistoryValues) {
    // an empty query is meaningful, only an absent one is skipped
    if let Some(query) = history.get(HistorySearchParam::Query.as_str()) {
        values.query = Some(query.clone());
    }
}

fn parse_sort_by(history: &BTreeMap<String, String>, values: &mut HistoryValues) {
    if let Some(sort_by) = history.get(HistorySearchParam::SortBy.as_str()) {
        if !sort_by.is_empty() {
            values.sort_option_id = Some(sort_by.clone());
        }
    }
}

fn parse_facets_filters(history: &BTreeMap<String, String>, values: &mut HistoryValues) {
    let Some(expression) = history.get(HistorySearchParam::FacetsFilters.as_str()) else { return };
    if expression.is_empty() {
        return;
    }
    values.selected_terms_by_facet = Some(facets_expression::parse_facets_filters(expression));
}


/// Address-bar params of `state` for the search `search_name`.
pub fn encode(state: &HistoryState, search_name: &str) -> HistoryParams {
    let mut params = BTreeMap::new();
    let entries = [
        (HistorySearchParam::Query, state.query.clone()),
        (HistorySearchParam::SortBy, state.sort_option_id.clone()),
        (HistorySearchParam::FacetsFilters, state.facets_filters.clone()),
        (HistorySearchParam::Page, state.page.map(|page| page.to_string())),
    ];
    for (param, value) in entries {
        if let Some(value) = value {
            params.insert(param.as_str().to_string(), value);
        }
    }
    add_param_prefixes(params, search_name)
}

/// Values of the search `search_name` found in the address-bar `params`.
pub fn decode<I, K, V>(params: I, search_name: &str) -> HistoryValues
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let history = remove_param_prefixes(params, search_name);
    let mut values = HistoryValues::default();
    for (_param, parser) in HISTORY_PARSERS {
        parser(&history, &mut values);
    }
    values.history = history;
    values
}

/// Address-bar params once `params` of `search_name` replaced its previous ones.
///
/// Recognized keys of the session that are no longer set are removed; keys of
/// other sessions and unrelated params are kept in place.
pub fn merge_history(current: &[(String, String)], search_name: &str, params: &HistoryParams) -> Vec<(String, String)> {
    let mut merged = current
        .iter()
        .filter(|(key, _)| {
            let owned = unprefixed_key(search_name, key).and_then(HistorySearchParam::from_key);
            owned.is_none() || params.contains_key(key.as_str())
        })
        .cloned()
        .collect::<Vec<_>>();
    for (key, value) in params {
        // a repeated key would be read back with its last value
        merged.retain(|(k, _)| k != key);
        merged.push((key.clone(), value.clone()));
    }
    merged
}


#[cfg(test)]
mod tests {
    use super::*;
    use common::search_const::DEFAULT_SEARCH_NAME;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    use crate::data_definitions::url_param::parse_query_string;

    fn set(terms: &[&str]) -> BTreeSet<String> {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_encode_default_search() {
        let state = HistoryState {
            query: Some("milk".to_string()),
            sort_option_id: None,
            facets_filters: Some("brand:a".to_string()),
            page: Some(2),
        };
        let params = encode(&state, DEFAULT_SEARCH_NAME);
        assert_eq!(
            params,
            HistoryParams::from([
                ("q".to_string(), "milk".to_string()),
                ("facetsFilters".to_string(), "brand:a".to_string()),
                ("page".to_string(), "2".to_string()),
            ])
        );
    }

    #[test]
    fn test_encode_keeps_empty_strings_and_prefixes() {
        let state = HistoryState { query: Some(String::new()), ..Default::default() };
        let params = encode(&state, "products");
        assert_eq!(params, HistoryParams::from([("products.q".to_string(), String::new())]));
    }

    #[test]
    fn test_decode_end_to_end_address_bar() {
        let params = parse_query_string("?q=milk&page=3&facetsFilters=brand:(a OR b) AND nutriscore:c");
        let values = decode(params, DEFAULT_SEARCH_NAME);
        assert_eq!(values.query.as_deref(), Some("milk"));
        assert_eq!(values.page, Some(3));
        let selected = values.selected_terms_by_facet.unwrap();
        assert_eq!(selected["brand"], set(&["a", "b"]));
        assert_eq!(selected["nutriscore"], set(&["c"]));
    }

    #[test]
    fn test_decode_distinguishes_absent_and_empty_query() {
        let absent = decode(Vec::<(String, String)>::new(), DEFAULT_SEARCH_NAME);
        assert_eq!(absent.query, None);
        assert!(!absent.has_search_params());

        let empty = decode([("q", "")], DEFAULT_SEARCH_NAME);
        assert_eq!(empty.query, Some(String::new()));
        assert!(empty.has_search_params());
    }

    #[test]
    fn test_decode_is_tolerant() {
        let values = decode([("page", "zero"), ("sort_by", ""), ("facetsFilters", ""), ("utm", "x")], DEFAULT_SEARCH_NAME);
        assert_eq!(values.page, None);
        assert_eq!(values.sort_option_id, None);
        assert_eq!(values.selected_terms_by_facet, None);
        assert_eq!(decode([("page", "0")], DEFAULT_SEARCH_NAME).page, None);
        assert_eq!(values.unrecognized().collect::<Vec<_>>(), vec![(&"utm".to_string(), &"x".to_string())]);
    }

    #[test]
    fn test_unrecognized_keys_do_not_count_as_search() {
        let values = decode([("utm_source", "mail")], DEFAULT_SEARCH_NAME);
        assert!(!values.has_search_params());
        assert_eq!(values.history["utm_source"], "mail");
    }

    #[test]
    fn test_prefix_isolation() {
        let products = encode(
            &HistoryState { query: Some("bread".to_string()), page: Some(4), ..Default::default() },
            "products",
        );
        let recipes = encode(&HistoryState { query: Some("cake".to_string()), ..Default::default() }, "recipes");
        let address_bar = products.into_iter().chain(recipes).collect::<Vec<_>>();

        let values = decode(address_bar.clone(), "recipes");
        assert_eq!(values.query.as_deref(), Some("cake"));
        assert_eq!(values.page, None);
        assert_eq!(values.history.len(), 1);

        let values = decode(address_bar, DEFAULT_SEARCH_NAME);
        assert!(values.history.is_empty());
    }

    #[test]
    fn test_merge_history_only_touches_own_keys() {
        let current = parse_query_string("lang=fr&q=old&sort_by=name&products.q=bread&page=7");
        let params = encode(&HistoryState { query: Some("milk".to_string()), page: Some(1), ..Default::default() }, DEFAULT_SEARCH_NAME);
        let merged = merge_history(&current, DEFAULT_SEARCH_NAME, &params);
        assert_eq!(
            merged,
            vec![
                ("lang".to_string(), "fr".to_string()),
                ("products.q".to_string(), "bread".to_string()),
                ("page".to_string(), "1".to_string()),
                ("q".to_string(), "milk".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_history_named_search() {
        let current = parse_query_string("q=milk&products.sort_by=name&products.extra=1");
        let params = encode(&HistoryState { query: Some("bread".to_string()), ..Default::default() }, "products");
        let merged = merge_history(&current, "products", &params);
        assert_eq!(
            merged,
            vec![
                ("q".to_string(), "milk".to_string()),
                ("products.extra".to_string(), "1".to_string()),
                ("products.q".to_string(), "bread".to_string()),
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_selection_round_trip(
            selected in prop::collection::btree_map(
                "[a-z][a-z_]{0,8}",
                prop::collection::btree_set("\\PC{0,10}", 1..4),
                1..4,
            ),
            search_name in prop_oneof![Just(DEFAULT_SEARCH_NAME.to_string()), "[a-z]{1,8}"],
        ) {
            let state = HistoryState::default().with_selected_terms(&selected);
            let values = decode(encode(&state, &search_name), &search_name);
            prop_assert_eq!(values.selected_terms_by_facet, Some(selected));
        }

        #[test]
        fn prop_other_search_never_observed(
            query in "\\PC{0,10}",
            page in 1u32..1000,
            name_a in "[a-z]{1,6}",
            name_b in "[A-Z]{1,6}",
        ) {
            let params = encode(&HistoryState { query: Some(query), page: Some(page), ..Default::default() }, &name_b);
            let values = decode(params.clone(), &name_a);
            prop_assert!(values.history.is_empty());
            prop_assert_eq!(values.query, None);
            prop_assert!(decode(params, DEFAULT_SEARCH_NAME).history.is_empty());
        }
    }
}
