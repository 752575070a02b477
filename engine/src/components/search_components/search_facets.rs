//! Headless facets widget: declared facets and the terms selected in them.

use std::{cell::RefCell, collections::BTreeSet};

use common::search_query::SelectedTermsByFacet;

use crate::{
    collaborators::FacetsCollaborator,
    events::{EventBus, SearchEvent},
    history::facets_expression::facet_clause,
};

pub struct FacetsSelection {
    search_name: String,
    facets: Vec<String>,
    selected: RefCell<SelectedTermsByFacet>,
    events: Option<EventBus>,
}

impl FacetsSelection {
    pub fn new(search_name: impl Into<String>, facets: Vec<String>) -> Self {
        Self {
            search_name: search_name.into(),
            facets,
            selected: RefCell::new(SelectedTermsByFacet::new()),
            events: None,
        }
    }

    /// Announce selection changes and reset launches on `events`.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn search_name(&self) -> &str {
        &self.search_name
    }

    pub fn selected_terms(&self) -> SelectedTermsByFacet {
        self.selected.borrow().clone()
    }

    pub fn is_selected(&self, facet: &str, term: &str) -> bool {
        self.selected
            .borrow()
            .get(facet)
            .is_some_and(|terms| terms.contains(term))
    }

    /// Select or unselect one term. Unknown facets are ignored.
    pub fn set_term(&self, facet: &str, term: &str, checked: bool) {
        if !self.facets.iter().any(|f| f == facet) {
            tracing::debug!("facet {} is not part of search {}", facet, self.search_name);
            return;
        }
        {
            let mut selected = self.selected.borrow_mut();
            let entry = selected.entry(facet.to_string()).or_insert(BTreeSet::new());
            if checked {
                entry.insert(term.to_string());
            } else {
                entry.remove(term);
            }
            if entry.is_empty() {
                selected.remove(facet);
            }
        }
        self.publish(SearchEvent::FacetSelected { search_name: self.search_name.clone() });
    }

    /// Returns whether the term is selected afterwards.
    pub fn toggle_term(&self, facet: &str, term: &str) -> bool {
        let checked = !self.is_selected(facet, term);
        self.set_term(facet, term, checked);
        self.is_selected(facet, term)
    }

    fn publish(&self, event: SearchEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}

impl FacetsCollaborator for FacetsSelection {
    fn facets_names(&self) -> Vec<String> {
        self.facets.clone()
    }

    fn search_filters(&self) -> Vec<String> {
        let selected = self.selected.borrow();
        self.facets
            .iter()
            .filter_map(|facet| {
                let terms = selected.get(facet)?;
                facet_clause(facet, terms.iter().map(String::as_str))
            })
            .collect()
    }

    fn set_selected_terms_by_facet(&self, selected: &SelectedTermsByFacet) {
        let mut own = self.selected.borrow_mut();
        own.clear();
        for facet in &self.facets {
            if let Some(terms) = selected.get(facet).filter(|terms| !terms.is_empty()) {
                own.insert(facet.clone(), terms.clone());
            }
        }
    }

    fn reset(&self, launch_search: bool) {
        self.selected.borrow_mut().clear();
        self.publish(SearchEvent::FacetSelected { search_name: self.search_name.clone() });
        if launch_search {
            self.publish(SearchEvent::LaunchSearch { search_name: self.search_name.clone() });
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> FacetsSelection {
        FacetsSelection::new("products", vec!["brand".to_string(), "nutriscore".to_string()])
    }

    #[test]
    fn test_filters_follow_declared_order() {
        let facets = selection();
        facets.toggle_term("nutriscore", "c");
        facets.toggle_term("brand", "b");
        facets.toggle_term("brand", "a");
        assert_eq!(facets.search_filters(), vec!["brand:(a OR b)".to_string(), "nutriscore:c".to_string()]);
        assert!(!facets.toggle_term("brand", "a"));
        assert_eq!(facets.search_filters()[0], "brand:b");
        facets.set_term("labels", "organic", true);
        assert!(!facets.is_selected("labels", "organic"));
    }

    #[test]
    fn test_set_selected_terms_keeps_declared_facets() {
        let facets = selection();
        facets.toggle_term("brand", "x");
        let selected = SelectedTermsByFacet::from([
            ("nutriscore".to_string(), BTreeSet::from(["a".to_string()])),
            ("labels".to_string(), BTreeSet::from(["organic".to_string()])),
        ]);
        facets.set_selected_terms_by_facet(&selected);
        assert_eq!(
            facets.selected_terms(),
            SelectedTermsByFacet::from([("nutriscore".to_string(), BTreeSet::from(["a".to_string()]))])
        );
    }

    #[tokio::test]
    async fn test_reset_launches_search() {
        let events = EventBus::default();
        let mut receiver = events.subscribe();
        let facets = selection().with_events(events);
        facets.toggle_term("brand", "a");
        facets.reset(true);
        assert!(facets.search_filters().is_empty());
        let name = "products".to_string();
        assert_eq!(receiver.recv().await.unwrap(), SearchEvent::FacetSelected { search_name: name.clone() });
        assert_eq!(receiver.recv().await.unwrap(), SearchEvent::FacetSelected { search_name: name.clone() });
        assert_eq!(receiver.recv().await.unwrap(), SearchEvent::LaunchSearch { search_name: name });
    }
}
