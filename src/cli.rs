use std::path::PathBuf;

use clap::Parser;

/// Polls a Redis server's INFO report and prints memory, connection and
/// cache metrics as JSON.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "redis-monitor", version, about)]
pub struct Args {
    /// JSON config file
    #[arg(short, long, default_value = "config/config.json")]
    pub config: PathBuf,

    /// Server address (`host:port` or `redis://` URL), overrides `server.url`
    #[arg(long)]
    pub url: Option<String>,

    /// Server password, overrides `server.password`
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Number of collection rounds
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Seconds between rounds
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Deadline for each INFO query, in milliseconds
    #[arg(long)]
    pub query_timeout_ms: Option<u64>,
}
