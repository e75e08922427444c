use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use starwatch::api::{self, ApiState};
use starwatch::sink::ClickHouseSink;
use starwatch::Config;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Diagnostic HTTP front-end for the harvesting service
#[derive(Debug, Parser)]
#[command(name = "server", version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Path to the YAML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    starwatch::logging::init(&cli.log_level)?;

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let state = ApiState {
        sink: Arc::new(ClickHouseSink::new(&config.clickhouse)?),
        started_at: Utc::now(),
    };

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!("diagnostic API listening on {}", cli.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
