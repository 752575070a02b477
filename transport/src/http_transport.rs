//! `reqwest` implementation of the search transport.

use anyhow::Context;
use common::{
    search_result::SearchResponse,
    transport::{HttpMethod, SearchRequest, SearchTransport},
};
use reqwest::header::CONTENT_TYPE;

use crate::config::TransportConfig;

#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &TransportConfig) -> anyhow::Result<Self> {
        #[allow(unused_mut)]
        let mut builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(timeout_secs));
        }
        #[cfg(target_arch = "wasm32")]
        let _ = config;
        let client = builder.build().context("failed to build http client")?;
        Ok(Self { client })
    }

    /// Client configured from the environment, see [`TransportConfig::from_env`].
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_config(&TransportConfig::from_env())
    }

    pub fn build_request(&self, request: &SearchRequest) -> anyhow::Result<reqwest::RequestBuilder> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(request.url()),
            HttpMethod::Post => {
                let body = request.json_body().context("failed to serialize search params")?;
                self.client
                    .post(request.url())
                    .header(CONTENT_TYPE, "application/json")
                    .body(body)
            }
        };
        Ok(builder)
    }
}

impl SearchTransport for HttpTransport {
    async fn execute(&self, request: SearchRequest) -> anyhow::Result<SearchResponse> {
        tracing::info!(method = request.method.as_str(), url = %request.search_url, "search request");
        let response = self
            .build_request(&request)?
            .send()
            .await
            .with_context(|| format!("{} {} failed", request.method.as_str(), request.search_url))?;
        let status = response.status();
        let response_txt = response.text().await.context("failed to read search response")?;
        if status.is_client_error() || status.is_server_error() {
            anyhow::bail!("Error: {}: {}", status, response_txt);
        }
        tracing::debug!(len = response_txt.len(), "search response");
        let response = SearchResponse::from_json_str(&response_txt).context("invalid search response")?;
        Ok(response)
    }
}
