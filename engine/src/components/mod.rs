pub mod search_components;
