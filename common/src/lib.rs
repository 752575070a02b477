//! Common library exports shared between the search engine and its transport.

extern crate serde;


pub mod search_const;
pub mod search_query;
pub mod search_params;
pub mod search_result;
pub mod transport;
