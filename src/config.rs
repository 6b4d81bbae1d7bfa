use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::cli::Args;
use crate::error::ConfigError;

// ─── Defaults ────────────────────────────────────────────────────

fn default_rounds() -> u32 {
    5
}
fn default_interval_secs() -> u64 {
    1
}
fn default_query_timeout_ms() -> u64 {
    5_000
}

// ─── Config file schema ──────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Where to connect and how to authenticate.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerConfig {
    /// `host:port` or `redis://` URL; doubles as the instance label
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub password: String,
}

/// Shape of the polling loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            interval_secs: default_interval_secs(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

// ─── Loading ─────────────────────────────────────────────────────

impl Config {
    /// Reads and parses a config file without validating it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// File first, then command-line overrides, then validation.
    ///
    /// A missing file is tolerated only when `--url` names the server.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match Self::from_file(&args.config) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. })
                if source.kind() == ErrorKind::NotFound && args.url.is_some() =>
            {
                tracing::debug!(path = %args.config.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };

        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &Args) {
        if let Some(url) = &args.url {
            self.server.url = url.clone();
        }
        if let Some(password) = &args.password {
            self.server.password = password.clone();
        }
        if let Some(rounds) = args.rounds {
            self.monitor.rounds = rounds;
        }
        if let Some(secs) = args.interval_secs {
            self.monitor.interval_secs = secs;
        }
        if let Some(ms) = args.query_timeout_ms {
            self.monitor.query_timeout_ms = ms;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::invalid("server.url", "must not be empty"));
        }
        if self.monitor.rounds == 0 {
            return Err(ConfigError::invalid("monitor.rounds", "must be at least 1"));
        }
        if self.monitor.interval_secs == 0 {
            return Err(ConfigError::invalid(
                "monitor.interval_secs",
                "must be at least 1",
            ));
        }
        if self.monitor.query_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "monitor.query_timeout_ms",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.monitor.interval_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.monitor.query_timeout_ms)
    }
}
