//! URL parameter helpers: session prefixes and address-bar query strings.

use std::collections::BTreeMap;

use common::search_const::{DEFAULT_SEARCH_NAME, PARAM_PREFIX_SEPARATOR};

pub fn is_default_search_name(search_name: &str) -> bool {
    search_name == DEFAULT_SEARCH_NAME
}

/// Address-bar key of `key` for the given search.
pub fn prefixed_key(search_name: &str, key: &str) -> String {
    if is_default_search_name(search_name) {
        key.to_string()
    } else {
        format!("{search_name}{PARAM_PREFIX_SEPARATOR}{key}")
    }
}

/// Key of `param` inside the search namespace, `None` when it belongs to someone else.
///
/// The default search owns the keys holding no separator at all.
pub fn unprefixed_key<'a>(search_name: &str, param: &'a str) -> Option<&'a str> {
    if is_default_search_name(search_name) {
        if param.contains(PARAM_PREFIX_SEPARATOR) { None } else { Some(param) }
    } else {
        param
            .strip_prefix(search_name)?
            .strip_prefix(PARAM_PREFIX_SEPARATOR)
    }
}

pub fn add_param_prefixes(params: BTreeMap<String, String>, search_name: &str) -> BTreeMap<String, String> {
    params
        .into_iter()
        .map(|(key, value)| (prefixed_key(search_name, &key), value))
        .collect()
}

/// Keep only the params of `search_name`, without their prefix.
///
/// When a key is repeated the last value wins, as with `URLSearchParams`.
pub fn remove_param_prefixes<I, K, V>(params: I, search_name: &str) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut history = BTreeMap::new();
    for (key, value) in params {
        if let Some(key) = unprefixed_key(search_name, key.as_ref()) {
            history.insert(key.to_string(), value.into());
        }
    }
    history
}

/// Parse `?a=1&b=2` (leading `?` optional) into ordered pairs.
pub fn parse_query_string(search: &str) -> Vec<(String, String)> {
    let search = search.strip_prefix('?').unwrap_or(search);
    url::form_urlencoded::parse(search.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

pub fn to_query_string(params: &[(String, String)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
