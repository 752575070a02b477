//! Errors surfaced by search sessions.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0:#}")]
    Transport(anyhow::Error),

    #[error("invalid page {0}, pages start at 1")]
    InvalidPage(u32),
}
