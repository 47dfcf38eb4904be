use almanac::client::{Agent, CliClient, Console, OllamaTransport};
use almanac::config::Config;
use almanac::search::DuckDuckGo;
use almanac::tools::{ToolContext, default_toolset};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_ansi(config.color())
        .with_writer(std::io::stderr)
        .init();

    let http = config.http_client().context("building http client")?;
    let transport = OllamaTransport::new(&config, http.clone());
    let context = ToolContext::new(DuckDuckGo::new(http), config.max_results);
    let toolset = default_toolset().context("building tool catalog")?;
    tracing::debug!(model = %config.model, base_url = %config.base_url, "starting");

    let agent = Agent::new(transport, toolset, context);
    let mut cli_client = CliClient::new(agent, Console::stdio(config.color()));
    cli_client.chat().await?;
    Ok(())
}
