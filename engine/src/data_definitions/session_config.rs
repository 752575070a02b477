//! Settings of a search session and of its pager.

use serde::{Deserialize, Serialize};

use common::{
    search_const::{DEFAULT_DISPLAYED_PAGES, DEFAULT_LANGS, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_NAME},
    search_query::{SearchState, split_languages},
};

fn default_base_url() -> String {
    std::env::var("SEARCH_API_URL").unwrap_or("/".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Enables several searches on the same page; collaborators bind to it.
    pub name: String,
    pub base_url: String,
    /// `;` separated languages, the first one is the main language.
    pub langs: String,
    /// Index to query, the API default index when unset.
    pub index: Option<String>,
    /// Boost nearby query terms (only relevant for the default sort).
    pub boost_phrase: bool,
    pub page_size: u32,
    /// Launch a search at startup even if the address bar holds none.
    pub auto_launch: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SEARCH_NAME.to_string(),
            base_url: default_base_url(),
            langs: DEFAULT_LANGS.to_string(),
            index: None,
            boost_phrase: false,
            page_size: DEFAULT_PAGE_SIZE,
            auto_launch: false,
        }
    }
}

impl SessionConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// `<base>/search`, whatever the number of trailing slashes of the base url.
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }

    pub fn initial_state(&self) -> SearchState {
        SearchState {
            page_size: self.page_size,
            index_id: self.index.clone(),
            languages: split_languages(&self.langs),
            boost_phrase: self.boost_phrase,
            ..SearchState::default()
        }
    }
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    pub search_name: String,
    /// How many page numbers are displayed as links.
    pub displayed_pages: u32,
    pub display_first: bool,
    pub display_last: bool,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            search_name: DEFAULT_SEARCH_NAME.to_string(),
            displayed_pages: DEFAULT_DISPLAYED_PAGES,
            display_first: true,
            display_last: true,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json_with_defaults() {
        let config = SessionConfig::from_json_str(
            r#"{"name": "products", "base_url": "https://api.example.org//", "langs": "fr;en", "page_size": 24}"#,
        )
        .unwrap();
        assert_eq!(config.name, "products");
        assert_eq!(config.search_url(), "https://api.example.org/search");
        assert!(!config.boost_phrase);
        assert!(!config.auto_launch);

        let state = config.initial_state();
        assert_eq!(state.languages, vec!["fr", "en"]);
        assert_eq!(state.page_size, 24);
        assert_eq!(state.index_id, None);
        assert_eq!(state.query, "");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(SessionConfig::from_json_str(r#"{"page_size": "many"}"#).is_err());
    }

    #[test]
    fn test_pager_defaults() {
        let config: PagerConfig = serde_json::from_str(r#"{"search_name": "products"}"#).unwrap();
        assert_eq!(config.displayed_pages, 5);
        assert!(config.display_first && config.display_last);
    }
}
