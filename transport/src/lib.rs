//! HTTP transport carrying search requests to the search API.

pub mod config;
pub mod http_transport;

pub use config::TransportConfig;
pub use http_transport::HttpTransport;
