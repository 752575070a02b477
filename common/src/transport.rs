//! Contract between the search engine and whatever carries requests to the API.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{search_params::RequestParams, search_result::SearchResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A fully built call to the `/search` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// `<base>/search`, without query string.
    pub search_url: String,
    pub method: HttpMethod,
    pub params: RequestParams,
}

impl SearchRequest {
    /// Url to call: GET requests carry their params in the query string.
    pub fn url(&self) -> String {
        match self.method {
            HttpMethod::Get => format!("{}?{}", self.search_url, self.params.to_query_string()),
            HttpMethod::Post => self.search_url.clone(),
        }
    }

    /// JSON body for POST requests.
    pub fn json_body(&self) -> Option<String> {
        match self.method {
            HttpMethod::Get => None,
            HttpMethod::Post => serde_json::to_string(&self.params).ok(),
        }
    }
}

/// Executes search requests and validates the response shape.
pub trait SearchTransport {
    fn execute(&self, request: SearchRequest) -> impl Future<Output = anyhow::Result<SearchResponse>>;
}
