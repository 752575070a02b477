//! Headless sort widget.

use std::cell::RefCell;

use common::search_params::{ParamValue, RequestParams};
use serde::{Deserialize, Serialize};

use crate::collaborators::SortCollaborator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SortCriterion {
    /// Sort on a document field, `sort_by=[-]field`.
    Field {
        field: String,
        #[serde(default)]
        descending: bool,
    },
    /// Sort with a server-side script; its parameters can only be sent by POST.
    Script {
        script: String,
        #[serde(default)]
        parameters: serde_json::Value,
    },
}

impl SortCriterion {
    pub fn sort_parameters(&self) -> RequestParams {
        let mut params = RequestParams::new();
        match self {
            Self::Field { field, descending } => {
                let sort_by = if *descending { format!("-{field}") } else { field.clone() };
                params.insert("sort_by", sort_by);
            }
            Self::Script { script, parameters } => {
                params.insert("sort_by", script.as_str());
                params.insert("sort_params", ParamValue::from_json(parameters.clone()));
            }
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOption {
    pub id: String,
    #[serde(flatten)]
    pub criterion: SortCriterion,
}


pub struct SortOptions {
    search_name: String,
    options: Vec<SortOption>,
    selected: RefCell<Option<String>>,
}

impl SortOptions {
    pub fn new(search_name: impl Into<String>, options: Vec<SortOption>) -> Self {
        Self {
            search_name: search_name.into(),
            options,
            selected: RefCell::new(None),
        }
    }

    pub fn search_name(&self) -> &str {
        &self.search_name
    }

    pub fn options(&self) -> &[SortOption] {
        &self.options
    }

    /// Returns false, and keeps the current choice, for an unknown id.
    pub fn select(&self, id: &str) -> bool {
        if !self.options.iter().any(|option| option.id == id) {
            tracing::warn!("unknown sort option {} for search {}", id, self.search_name);
            return false;
        }
        *self.selected.borrow_mut() = Some(id.to_string());
        true
    }

    pub fn selected_option(&self) -> Option<&SortOption> {
        let selected = self.selected.borrow();
        let id = selected.as_deref()?;
        self.options.iter().find(|option| option.id == id)
    }
}

impl SortCollaborator for SortOptions {
    fn sort_parameters(&self) -> Option<RequestParams> {
        self.selected_option().map(|option| option.criterion.sort_parameters())
    }

    fn sort_option_id(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    fn set_sort_option_by_id(&self, sort_option_id: Option<&str>) {
        match sort_option_id {
            Some(id) => {
                self.select(id);
            }
            None => *self.selected.borrow_mut() = None,
        }
    }
}
