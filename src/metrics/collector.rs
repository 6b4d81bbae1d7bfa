use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use chrono::Utc;
use redis::RedisResult;
use tracing::debug;

use super::info_parser::{field_u64, parse_info};
use super::{
    hit_rate, usage_percentage, BaseMetric, CacheMetrics, ConnectionMetrics, MemoryMetrics,
    MetricType, MetricsSnapshot,
};
use crate::error::{CollectError, QueryError};

// ─── Configuration ───────────────────────────────────────────────

/// Deadline for a single `INFO` round-trip unless the caller picks one.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── INFO sections ───────────────────────────────────────────────

/// The `INFO` sections the collector reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoSection {
    Memory,
    Clients,
    Replication,
    Stats,
}

impl InfoSection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Clients => "clients",
            Self::Replication => "replication",
            Self::Stats => "stats",
        }
    }
}

impl fmt::Display for InfoSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Seams ───────────────────────────────────────────────────────

/// Anything that can answer `INFO <section>` with the raw text reply.
/// Implemented for `ConnectionManager` in `redis_client`.
pub trait InfoSource {
    async fn info(&mut self, section: InfoSection) -> RedisResult<String>;
}

/// The four collection operations the poller drives.
pub trait MetricCollector {
    async fn collect_memory(&mut self) -> Result<MemoryMetrics, QueryError>;
    async fn collect_connection(&mut self) -> Result<ConnectionMetrics, QueryError>;
    async fn collect_cache(&mut self) -> Result<CacheMetrics, QueryError>;

    /// Memory, then connection, then cache. The first failure aborts the
    /// call; a partial snapshot is never returned.
    async fn collect_all(&mut self) -> Result<MetricsSnapshot, CollectError> {
        let memory = self.collect_memory().await.map_err(|source| CollectError {
            kind: MetricType::Memory,
            source,
        })?;

        let connection = self
            .collect_connection()
            .await
            .map_err(|source| CollectError {
                kind: MetricType::Connection,
                source,
            })?;

        let cache = self.collect_cache().await.map_err(|source| CollectError {
            kind: MetricType::Cache,
            source,
        })?;

        Ok(MetricsSnapshot {
            memory: Some(memory),
            connection: Some(connection),
            cache: Some(cache),
            collected_at: Utc::now(),
        })
    }
}

// ─── RedisCollector ──────────────────────────────────────────────

/// Reads one server's `INFO` sections and turns them into typed records.
///
/// Holds nothing between calls except the connection and the instance
/// label, so consecutive `collect_all` calls are independent.
pub struct RedisCollector<S> {
    source: S,
    instance: String,
    query_timeout: Duration,
}

impl<S: InfoSource> RedisCollector<S> {
    pub fn new(source: S, instance: impl Into<String>) -> Self {
        Self {
            source,
            instance: instance.into(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// One timed `INFO <section>` round-trip, parsed.
    async fn query(&mut self, section: InfoSection) -> Result<HashMap<String, String>, QueryError> {
        let timeout = self.query_timeout;

        // ── Redis timed section ─────────────────────────────────────
        let t_redis = Instant::now();
        let reply = tokio::time::timeout(timeout, self.source.info(section))
            .await
            .map_err(|_| QueryError::Timeout { section, timeout })?
            .map_err(|source| QueryError::Redis { section, source })?;
        let redis_us = t_redis.elapsed().as_micros() as u64;
        // ────────────────────────────────────────────────────────────

        debug!(
            instance = %self.instance,
            %section,
            redis_us,
            bytes = reply.len(),
            "INFO reply"
        );

        Ok(parse_info(&reply))
    }

    fn base(&self, metric_type: MetricType, issued_at: chrono::DateTime<Utc>) -> BaseMetric {
        BaseMetric::new(metric_type, &self.instance, issued_at)
    }
}

impl<S: InfoSource> MetricCollector for RedisCollector<S> {
    async fn collect_memory(&mut self) -> Result<MemoryMetrics, QueryError> {
        let issued_at = Utc::now();
        let fields = self.query(InfoSection::Memory).await?;

        let used = field_u64(&fields, "used_memory");
        let max = field_u64(&fields, "maxmemory");

        Ok(MemoryMetrics {
            base: self.base(MetricType::Memory, issued_at),
            used_memory_bytes: used,
            max_memory_bytes: max,
            memory_frag_ratio: 0.0,
            memory_usage_perc: usage_percentage(used, max),
        })
    }

    async fn collect_connection(&mut self) -> Result<ConnectionMetrics, QueryError> {
        let issued_at = Utc::now();
        let clients = self.query(InfoSection::Clients).await?;
        let replication = self.query(InfoSection::Replication).await?;

        Ok(ConnectionMetrics {
            base: self.base(MetricType::Connection, issued_at),
            connected_clients: field_u64(&clients, "connected_clients"),
            blocked_clients: field_u64(&clients, "blocked_clients"),
            connected_slaves: field_u64(&replication, "connected_slaves"),
            max_clients: field_u64(&clients, "maxclients"),
        })
    }

    async fn collect_cache(&mut self) -> Result<CacheMetrics, QueryError> {
        let issued_at = Utc::now();
        let fields = self.query(InfoSection::Stats).await?;

        let hits = field_u64(&fields, "keyspace_hits");
        let misses = field_u64(&fields, "keyspace_misses");

        Ok(CacheMetrics {
            base: self.base(MetricType::Cache, issued_at),
            keyspace_hits: hits,
            keyspace_misses: misses,
            hit_rate: hit_rate(hits, misses),
            evictions: field_u64(&fields, "evicted_keys"),
            expired_keys: field_u64(&fields, "expired_keys"),
        })
    }
}

// ─── Test double ─────────────────────────────────────────────────
