use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod error;
mod metrics;
mod poller;
mod redis_client;
mod render;

use config::Config;
use metrics::RedisCollector;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries nothing but snapshots.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> anyhow::Result<()> {
    // ── 1. Configuration ─────────────────────────────────────────
    let args = cli::Args::parse();
    let cfg = Config::load(&args).context("failed to load configuration")?;

    // ── 2. Connect to Redis ──────────────────────────────────────
    info!(instance = %cfg.server.url, "connecting to Redis");
    let conn = redis_client::connect(&cfg.server.url, &cfg.server.password).await?;
    info!(instance = %cfg.server.url, "connected");

    // ── 3. Build the collector ───────────────────────────────────
    let mut collector =
        RedisCollector::new(conn, cfg.server.url.clone()).with_query_timeout(cfg.query_timeout());
    info!(
        instance = collector.instance(),
        rounds = cfg.monitor.rounds,
        interval_secs = cfg.monitor.interval_secs,
        "starting collection"
    );

    // ── 4. Poll until done or interrupted ────────────────────────
    let mut stdout = std::io::stdout().lock();
    tokio::select! {
        res = poller::run(&mut collector, cfg.monitor.rounds, cfg.interval(), &mut stdout) => {
            let done = res.context("failed to collect metrics")?;
            info!(rounds = done, "finished");
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, stopping");
        }
    }

    Ok(())
}
