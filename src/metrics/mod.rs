pub mod collector;
pub mod info_parser;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use collector::{MetricCollector, RedisCollector};

// ─── Metric categories ───────────────────────────────────────────

/// Tags every record with the category it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Memory,
    Connection,
    Cache,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Connection => "connection",
            Self::Cache => "cache",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Records ─────────────────────────────────────────────────────

/// Common header embedded in every typed record.
/// Set once when the record is built and never touched again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseMetric {
    /// When the first query feeding this record was issued
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    /// Address of the monitored server, exactly as configured
    pub instance: String,
}

impl BaseMetric {
    pub fn new(metric_type: MetricType, instance: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            metric_type,
            instance: instance.to_owned(),
        }
    }
}

/// Memory usage, from `INFO memory`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryMetrics {
    #[serde(flatten)]
    pub base: BaseMetric,
    pub used_memory_bytes: u64,
    /// 0 means no `maxmemory` limit is configured
    pub max_memory_bytes: u64,
    /// Reserved; no extraction path fills it yet.
    pub memory_frag_ratio: f64,
    #[serde(rename = "memory_usage_percentage")]
    pub memory_usage_perc: f64,
}

/// Client and replica counts, from `INFO clients` + `INFO replication`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionMetrics {
    #[serde(flatten)]
    pub base: BaseMetric,
    pub connected_clients: u64,
    pub blocked_clients: u64,
    pub connected_slaves: u64,
    pub max_clients: u64,
}

/// Keyspace hit/miss behaviour, from `INFO stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheMetrics {
    #[serde(flatten)]
    pub base: BaseMetric,
    pub keyspace_hits: u64,
    pub keyspace_misses: u64,
    pub hit_rate: f64,
    pub evictions: u64,
    pub expired_keys: u64,
}

/// Everything one `collect_all` call produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheMetrics>,
    /// Taken after the last sub-collection finished
    pub collected_at: DateTime<Utc>,
}

// ─── Derived ratios ──────────────────────────────────────────────

/// `used / max * 100`, or 0 when no limit is configured.
pub fn usage_percentage(used: u64, max: u64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    used as f64 / max as f64 * 100.0
}

/// `hits / (hits + misses) * 100`, or 0 before any lookup happened.
pub fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits.saturating_add(misses);
    if total == 0 {
        return 0.0;
    }
    hits as f64 / total as f64 * 100.0
}
