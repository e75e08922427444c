use anyhow::Context;
use clap::Parser;
use starwatch::sink::{ClickHouseSink, Sink};
use starwatch::{Config, ConcurrencyGate, GitHubClient, RateLimiter, RepositoryHarvester};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Harvests top-starred GitHub repositories into ClickHouse
#[derive(Debug, Parser)]
#[command(name = "starwatch", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run a cycle every N seconds instead of once
    #[arg(long, value_name = "SECS")]
    every: Option<u64>,

    /// Override the ranked-list page size
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Collect results without writing to ClickHouse
    #[arg(long)]
    dry_run: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    starwatch::logging::init(&cli.log_level)?;

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(limit) = cli.limit {
        config.harvest.page_size = limit;
    }

    let token = config.github_token()?.to_string();
    let limiter = Arc::new(RateLimiter::new(config.harvest.requests_per_second));
    let gate = ConcurrencyGate::new(config.harvest.max_concurrent_fetches);
    let client = Arc::new(GitHubClient::new(&token, limiter, gate)?);

    let sink: Option<Arc<dyn Sink>> = if cli.dry_run {
        None
    } else {
        Some(Arc::new(ClickHouseSink::new(&config.clickhouse)?))
    };

    let harvester = RepositoryHarvester::new(
        client,
        sink,
        config.harvest.page_size,
        config.harvest.lookback_hours,
    );

    match cli.every {
        None => {
            let results = harvester.harvest().await;
            info!("harvested {} repositories", results.len());
        }
        Some(secs) => {
            let mut ticker = tokio::time::interval(Duration::from_secs(secs));
            loop {
                ticker.tick().await;
                let results = harvester.harvest().await;
                info!("harvested {} repositories", results.len());
            }
        }
    }

    Ok(())
}
