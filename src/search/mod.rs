//! The web-search collaborator behind the `web_search` tool.

mod duckduckgo;

pub use duckduckgo::DuckDuckGo;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("search provider answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("could not read search results: {0}")]
    Parse(String),
}

/// Something that turns a query into ranked results, best first.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}
