//! Headless widgets bound to a search by name.

pub mod search_charts;
pub mod search_facets;
pub mod search_pages;
pub mod search_sort;
