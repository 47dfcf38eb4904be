use clap::Parser;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_MODEL: &str = "llama3.2:1b";

/// Startup configuration, read once and passed to whatever needs it.
#[derive(Debug, Clone, Parser)]
#[command(name = "almanac", version)]
#[command(about = "Stateless terminal chat with a local model, plus date and web-search tools")]
pub struct Config {
    /// Base URL of the model server's OpenAI-compatible API
    #[arg(long, env = "ALMANAC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model identifier to chat with
    #[arg(long, env = "ALMANAC_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Print diagnostics (tool gate, model calls, tool execution) to stderr
    #[arg(long, env = "ALMANAC_DEBUG")]
    pub debug: bool,

    /// Disable ANSI colors, e.g. when piping to a file
    #[arg(long, env = "ALMANAC_NO_COLOR")]
    pub no_color: bool,

    /// Request timeout for the model server and the search provider
    #[arg(long, env = "ALMANAC_TIMEOUT_SECS", default_value_t = 120)]
    pub timeout_secs: u64,

    /// Default number of web search results handed to the model
    #[arg(
        long,
        env = "ALMANAC_MAX_RESULTS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..=10)
    )]
    pub max_results: u32,
}

impl Config {
    pub fn color(&self) -> bool {
        !self.no_color
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Default tracing filter; `RUST_LOG` wins when set.
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "almanac=debug" } else { "warn" }
    }

    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(concat!("almanac/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}
