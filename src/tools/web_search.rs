use super::ToolContext;
use crate::search::SearchHit;
use crate::types::{Tool, ToolCallError};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, warn};

pub const NO_RESULTS: &str = "No results.";
pub const MAX_RESULTS_LIMIT: u32 = 10;
const EMPTY_QUERY: &str = "No results (empty query).";
const SNIPPET_CHARS: usize = 300;

#[derive(Debug, Deserialize, JsonSchema, Default)]
#[schemars(
    title = "web_search",
    description = "Search the internet for up-to-date information and return top results."
)]
pub struct WebSearch {
    #[schemars(description = "Search query")]
    pub query: String,

    #[serde(default)]
    #[schemars(description = "How many results to return (default 5, at most 10)")]
    pub max_results: Option<u32>,
}

#[async_trait]
impl Tool for WebSearch {
    type Context = ToolContext;

    async fn apply(&self, context: &Self::Context) -> Result<String, ToolCallError> {
        let query = self.query.trim();
        if query.is_empty() {
            warn!("web_search received empty query; skipping");
            return Ok(EMPTY_QUERY.to_string());
        }
        let max_results = self
            .max_results
            .unwrap_or(context.default_max_results)
            .clamp(1, MAX_RESULTS_LIMIT);

        debug!(query, max_results, "web_search called");
        let start = Instant::now();
        let hits = context.search.search(query, max_results as usize).await?;
        debug!(
            results = hits.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "web_search finished"
        );

        Ok(render_hits(&hits))
    }

    fn from_bare_argument(argument: &str) -> Option<Self> {
        Some(Self {
            query: argument.to_string(),
            max_results: None,
        })
    }
}

fn render_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_RESULTS.to_string();
    }
    hits.iter()
        .map(|hit| {
            let snippet: String = hit
                .snippet
                .replace('\n', " ")
                .chars()
                .take(SNIPPET_CHARS)
                .collect();
            format!("- {}\n  {}\n  {}", hit.title, hit.url, snippet)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchError, SearchProvider};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorded {
        hits: Vec<SearchHit>,
        fail: bool,
        requests: Mutex<Vec<(String, usize)>>,
    }

    #[async_trait]
    impl SearchProvider for Arc<Recorded> {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
            self.requests
                .lock()
                .unwrap()
                .push((query.to_string(), max_results));
            if self.fail {
                return Err(SearchError::Status(reqwest::StatusCode::TOO_MANY_REQUESTS));
            }
            Ok(self.hits.iter().take(max_results).cloned().collect())
        }
    }

    fn hit(n: usize) -> SearchHit {
        SearchHit {
            title: format!("Title {n}"),
            url: format!("https://example.com/{n}"),
            snippet: format!("line one\nline two of {n}"),
        }
    }

    fn context(recorded: &Arc<Recorded>) -> ToolContext {
        ToolContext::new(recorded.clone(), 5)
    }

    fn search(query: &str, max_results: Option<u32>) -> WebSearch {
        WebSearch {
            query: query.to_string(),
            max_results,
        }
    }

    #[tokio::test]
    async fn formats_each_hit_on_its_own_block() {
        let recorded = Arc::new(Recorded {
            hits: vec![hit(1), hit(2)],
            ..Default::default()
        });
        let output = search("rust", None).apply(&context(&recorded)).await.unwrap();
        assert_eq!(
            output,
            "- Title 1\n  https://example.com/1\n  line one line two of 1\n\
             - Title 2\n  https://example.com/2\n  line one line two of 2"
        );
    }

    #[tokio::test]
    async fn zero_hits_return_the_sentinel() {
        let recorded = Arc::new(Recorded::default());
        let output = search("x", None).apply(&context(&recorded)).await.unwrap();
        assert_eq!(output, NO_RESULTS);
    }

    #[tokio::test]
    async fn empty_query_skips_the_provider() {
        let recorded = Arc::new(Recorded::default());
        let output = search("   ", None).apply(&context(&recorded)).await.unwrap();
        assert_eq!(output, EMPTY_QUERY);
        assert!(recorded.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn result_count_is_defaulted_and_clamped() {
        let recorded = Arc::new(Recorded::default());
        let context = context(&recorded);
        search("a", None).apply(&context).await.unwrap();
        search("b", Some(50)).apply(&context).await.unwrap();
        search("c", Some(0)).apply(&context).await.unwrap();

        let requests = recorded.requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            [("a".to_string(), 5), ("b".to_string(), 10), ("c".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn snippets_are_cut_to_a_single_short_line() {
        let recorded = Arc::new(Recorded {
            hits: vec![SearchHit {
                title: "Long".to_string(),
                url: "https://example.com".to_string(),
                snippet: "é".repeat(400),
            }],
            ..Default::default()
        });
        let output = search("long", None).apply(&context(&recorded)).await.unwrap();
        let snippet = output.lines().nth(2).unwrap().trim();
        assert_eq!(snippet.chars().count(), SNIPPET_CHARS);
    }

    #[tokio::test]
    async fn provider_failures_surface_as_search_errors() {
        let recorded = Arc::new(Recorded {
            fail: true,
            ..Default::default()
        });
        let err = search("rust", None).apply(&context(&recorded)).await.unwrap_err();
        assert!(matches!(err, ToolCallError::Search(_)));
    }
}
