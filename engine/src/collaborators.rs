//! Surfaces of the components a search session reads from.
//!
//! Facets, sort and charts widgets live outside of the engine. They bind to a
//! session by name through a [`CollaboratorDirectory`], and the session asks
//! for them again every time it needs them.

use std::rc::Rc;

use common::{search_params::RequestParams, search_query::SelectedTermsByFacet};

pub trait FacetsCollaborator {
    /// Facets whose aggregations should be requested.
    fn facets_names(&self) -> Vec<String>;
    /// Filter clauses, ANDed together by the session.
    fn search_filters(&self) -> Vec<String>;
    fn set_selected_terms_by_facet(&self, selected: &SelectedTermsByFacet);
    fn reset(&self, launch_search: bool);
}

pub trait SortCollaborator {
    /// Params of the selected sort option, `None` to keep the API default.
    fn sort_parameters(&self) -> Option<RequestParams>;
    fn sort_option_id(&self) -> Option<String>;
    fn set_sort_option_by_id(&self, sort_option_id: Option<&str>);
}

/// Chart request, as a GET token or a structured POST body entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSearchParam {
    Token(String),
    Spec(serde_json::Value),
}

impl ChartSearchParam {
    pub fn into_token(self) -> String {
        match self {
            Self::Token(token) => token,
            Self::Spec(spec) => spec.to_string(),
        }
    }

    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Token(token) => serde_json::Value::String(token),
            Self::Spec(spec) => spec,
        }
    }
}

pub trait ChartCollaborator {
    fn search_param(&self, is_get_request: bool) -> ChartSearchParam;
}

/// Lookup of the collaborators bound to a search name.
pub trait CollaboratorDirectory {
    fn facets(&self, search_name: &str) -> Vec<Rc<dyn FacetsCollaborator>>;
    /// Sort is a singleton: when several are bound, the first one wins.
    fn sort(&self, search_name: &str) -> Option<Rc<dyn SortCollaborator>>;
    fn charts(&self, search_name: &str) -> Vec<Rc<dyn ChartCollaborator>>;
}
