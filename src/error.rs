use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::metrics::collector::InfoSection;
use crate::metrics::MetricType;

// ─── Query errors ────────────────────────────────────────────────

/// A single `INFO <section>` round-trip that did not complete.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("INFO {section} failed: {source}")]
    Redis {
        section: InfoSection,
        #[source]
        source: redis::RedisError,
    },

    #[error("INFO {section} timed out after {}ms", .timeout.as_millis())]
    Timeout {
        section: InfoSection,
        timeout: Duration,
    },
}

impl QueryError {
    /// Which `INFO` section the failed query was scoped to.
    pub fn section(&self) -> InfoSection {
        match self {
            Self::Redis { section, .. } | Self::Timeout { section, .. } => *section,
        }
    }
}

/// Failure of `collect_all`, tagged with the category that aborted it.
#[derive(Debug, Error)]
#[error("{kind} metrics collection failed: {source}")]
pub struct CollectError {
    pub kind: MetricType,
    #[source]
    pub source: QueryError,
}

// ─── Bootstrap errors ────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("invalid Redis address \"{addr}\": {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: redis::RedisError,
    },

    #[error("cannot connect to Redis at {addr}: {source}")]
    Unreachable {
        addr: String,
        #[source]
        source: redis::RedisError,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid<S: Into<String>>(field: &'static str, message: S) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Why the polling loop stopped early.
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error("failed to write snapshot: {0}")]
    Output(#[from] std::io::Error),
}
