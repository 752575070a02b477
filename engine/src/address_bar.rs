//! Where search sessions read and write their history params.

use std::cell::RefCell;

use crate::{
    data_definitions::url_param::{parse_query_string, to_query_string},
    history::{HistoryParams, merge_history},
};

/// Shared by every session of a page; each session only touches its own keys.
pub trait AddressBar {
    /// Current params, in address-bar order.
    fn current_params(&self) -> Vec<(String, String)>;
    /// Push a new history entry where the params of `search_name` are replaced by `params`.
    fn push_search_params(&self, search_name: &str, params: &HistoryParams);
}


/// In-memory address bar, keeps every pushed entry.
#[derive(Debug, Default)]
pub struct MemoryAddressBar {
    entries: RefCell<Vec<Vec<(String, String)>>>,
}

impl MemoryAddressBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_query_string(search: &str) -> Self {
        Self {
            entries: RefCell::new(vec![parse_query_string(search)]),
        }
    }

    pub fn query_string(&self) -> String {
        to_query_string(&self.current_params())
    }

    /// Number of entries, the initial one included.
    pub fn history_len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl AddressBar for MemoryAddressBar {
    fn current_params(&self) -> Vec<(String, String)> {
        self.entries.borrow().last().cloned().unwrap_or_default()
    }

    fn push_search_params(&self, search_name: &str, params: &HistoryParams) {
        let merged = merge_history(&self.current_params(), search_name, params);
        self.entries.borrow_mut().push(merged);
    }
}


#[cfg(feature = "web")]
pub use browser::BrowserAddressBar;

#[cfg(feature = "web")]
mod browser {
    use wasm_bindgen::JsValue;

    use super::*;

    /// Address bar of the browser window, written with `history.pushState`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserAddressBar;

    impl AddressBar for BrowserAddressBar {
        fn current_params(&self) -> Vec<(String, String)> {
            let Some(window) = web_sys::window() else {
                return Vec::new();
            };
            match window.location().search() {
                Ok(search) => parse_query_string(&search),
                Err(e) => {
                    tracing::warn!("cannot read location search: {:?}", e);
                    Vec::new()
                }
            }
        }

        fn push_search_params(&self, search_name: &str, params: &HistoryParams) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let location = window.location();
            let merged = merge_history(&self.current_params(), search_name, params);
            let query = to_query_string(&merged);
            let pathname = location.pathname().unwrap_or_default();
            let hash = location.hash().unwrap_or_default();
            let url = if query.is_empty() {
                format!("{pathname}{hash}")
            } else {
                format!("{pathname}?{query}{hash}")
            };
            let pushed = window
                .history()
                .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(&url)));
            if let Err(e) = pushed {
                tracing::warn!("cannot push history entry {}: {:?}", url, e);
            }
        }
    }
}
