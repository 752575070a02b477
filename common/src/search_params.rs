//! Parameters sent to the search API, and their query-string form.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::search_const::API_LIST_DIVIDER;

/// Characters left untouched by javascript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
    /// Objects and arrays that can't be flattened in a query string.
    Structured(serde_json::Value),
}

impl ParamValue {
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Text(n.to_string()),
            },
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Structured(other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value fits a flat `key=value` query string entry.
    pub fn is_scalar(&self) -> bool {
        match self {
            Self::Structured(serde_json::Value::Object(_)) | Self::Structured(serde_json::Value::Array(_)) => false,
            _ => true,
        }
    }

    /// Value as written in a query string, `None` when the key must be left out.
    fn to_query_value(&self) -> Option<String> {
        match self {
            Self::Null => None,
            // a false flag is expressed by the absence of the key
            Self::Bool(false) => None,
            Self::Bool(true) => Some("true".to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::List(values) => Some(values.join(API_LIST_DIVIDER)),
            Self::Structured(value) => Some(value.to_string()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}


/// Parameters of one search API call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(BTreeMap<String, ParamValue>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Copy every entry of `other`, overriding existing keys.
    pub fn extend(&mut self, other: RequestParams) {
        self.0.extend(other.0);
    }

    /// Drop null entries.
    pub fn remove_empty(&mut self) {
        self.0.retain(|_key, value| !value.is_null());
    }

    pub fn has_structured_values(&self) -> bool {
        self.0.values().any(|value| !value.is_scalar())
    }

    /// Build the `a=1&b=2` form for GET requests.
    ///
    /// Keys and values are URI-encoded, false booleans are left out, and the
    /// encoded pairs are sorted so that the output does not depend on
    /// insertion history.
    pub fn to_query_string(&self) -> String {
        let mut pairs = self
            .0
            .iter()
            .filter_map(|(key, value)| {
                let value = value.to_query_value()?;
                Some(format!("{}={}", encode_uri_component(key), encode_uri_component(&value)))
            })
            .collect::<Vec<_>>();
        pairs.sort();
        pairs.join("&")
    }
}

impl FromIterator<(String, ParamValue)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
