//! Page-wide registry of collaborators, keyed by search name.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::collaborators::{ChartCollaborator, CollaboratorDirectory, FacetsCollaborator, SortCollaborator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

#[derive(Clone)]
enum Collaborator {
    Facets(Rc<dyn FacetsCollaborator>),
    Sort(Rc<dyn SortCollaborator>),
    Chart(Rc<dyn ChartCollaborator>),
}

#[derive(Clone)]
struct Registration {
    id: RegistrationId,
    search_name: String,
    collaborator: Collaborator,
}

/// Collaborators register when they mount and deregister when they unmount.
#[derive(Default)]
pub struct CollaboratorRegistry {
    next_id: Cell<u64>,
    registrations: RefCell<Vec<Registration>>,
}

impl CollaboratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, search_name: &str, collaborator: Collaborator) -> RegistrationId {
        let id = RegistrationId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.registrations.borrow_mut().push(Registration {
            id,
            search_name: search_name.to_string(),
            collaborator,
        });
        id
    }

    pub fn register_facets(&self, search_name: &str, facets: Rc<dyn FacetsCollaborator>) -> RegistrationId {
        self.register(search_name, Collaborator::Facets(facets))
    }

    pub fn register_sort(&self, search_name: &str, sort: Rc<dyn SortCollaborator>) -> RegistrationId {
        self.register(search_name, Collaborator::Sort(sort))
    }

    pub fn register_chart(&self, search_name: &str, chart: Rc<dyn ChartCollaborator>) -> RegistrationId {
        self.register(search_name, Collaborator::Chart(chart))
    }

    /// Returns false if `id` was not registered (anymore).
    pub fn deregister(&self, id: RegistrationId) -> bool {
        let mut registrations = self.registrations.borrow_mut();
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        registrations.len() != before
    }

    pub fn len(&self) -> usize {
        self.registrations.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.borrow().is_empty()
    }

    /// Collaborators bound to `search_name`, in registration order.
    ///
    /// The list is cloned so that callers never hold a borrow while calling into a collaborator.
    fn bound_to(&self, search_name: &str) -> Vec<Collaborator> {
        self.registrations
            .borrow()
            .iter()
            .filter(|registration| registration.search_name == search_name)
            .map(|registration| registration.collaborator.clone())
            .collect()
    }
}

impl CollaboratorDirectory for CollaboratorRegistry {
    fn facets(&self, search_name: &str) -> Vec<Rc<dyn FacetsCollaborator>> {
        self.bound_to(search_name)
            .into_iter()
            .filter_map(|collaborator| match collaborator {
                Collaborator::Facets(facets) => Some(facets),
                _ => None,
            })
            .collect()
    }

    fn sort(&self, search_name: &str) -> Option<Rc<dyn SortCollaborator>> {
        let mut sorts = self.bound_to(search_name).into_iter().filter_map(|collaborator| match collaborator {
            Collaborator::Sort(sort) => Some(sort),
            _ => None,
        });
        let first = sorts.next();
        let ignored = sorts.count();
        if ignored > 0 {
            tracing::warn!(search_name, ignored, "several sort elements bound to the same search, ignoring all but the first");
        }
        first
    }

    fn charts(&self, search_name: &str) -> Vec<Rc<dyn ChartCollaborator>> {
        self.bound_to(search_name)
            .into_iter()
            .filter_map(|collaborator| match collaborator {
                Collaborator::Chart(chart) => Some(chart),
                _ => None,
            })
            .collect()
    }
}
