use super::{SearchError, SearchHit, SearchProvider};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

const HTML_RESULTS_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const REDIRECT_BASE: &str = "https://duckduckgo.com/";

const RESULT_SELECTOR: &str = "div.result:not(.result--ad)";
const TITLE_SELECTOR: &str = "a.result__a";
const SNIPPET_SELECTOR: &str = ".result__snippet";

/// Keyless search through DuckDuckGo's HTML results page.
pub struct DuckDuckGo {
    http: reqwest::Client,
    endpoint: String,
}

impl DuckDuckGo {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: HTML_RESULTS_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGo {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("q", query), ("kp", "-2")])
            .send()
            .await?;
        // rate limiting answers 202 with a challenge page instead of results
        if response.status() != StatusCode::OK {
            return Err(SearchError::Status(response.status()));
        }
        let body = response.text().await?;
        let hits = parse_results(&body, max_results)?;
        debug!(query, hits = hits.len(), "results page parsed");
        Ok(hits)
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|err| SearchError::Parse(format!("selector `{css}`: {err:?}")))
}

fn parse_results(body: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
    let result = selector(RESULT_SELECTOR)?;
    let title = selector(TITLE_SELECTOR)?;
    let snippet = selector(SNIPPET_SELECTOR)?;

    let document = Html::parse_document(body);
    let hits = document
        .select(&result)
        .filter_map(|element| {
            let link = element.select(&title).next()?;
            let url = resolve_link(link.value().attr("href")?)?;
            Some(SearchHit {
                title: collapsed_text(link),
                url,
                snippet: element
                    .select(&snippet)
                    .next()
                    .map(collapsed_text)
                    .unwrap_or_default(),
            })
        })
        .take(max_results)
        .collect();
    Ok(hits)
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

// result links go through `//duckduckgo.com/l/?uddg=<target>`; unwrap to the target
fn resolve_link(href: &str) -> Option<String> {
    let url = Url::parse(REDIRECT_BASE).ok()?.join(href).ok()?;
    let is_redirect = url.domain().is_some_and(|domain| domain.ends_with("duckduckgo.com"))
        && url.path().starts_with("/l/");
    if is_redirect {
        url.query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
    } else {
        Some(url.to_string())
    }
}
