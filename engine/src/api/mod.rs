//! Building the calls to the search API.

pub mod query_params;
pub mod search_api;
