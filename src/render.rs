use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::metrics::MetricsSnapshot;

/// Five spaces per nesting level.
const INDENT: &[u8] = b"     ";

/// Writes one round as a header line followed by pretty-printed JSON.
pub fn write_snapshot<W: Write>(out: &mut W, round: u32, snapshot: &MetricsSnapshot) -> io::Result<()> {
    writeln!(out, "\n====== Metrics Collection {round} ======")?;

    let mut ser = serde_json::Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(INDENT));
    snapshot.serialize(&mut ser)?;

    writeln!(out)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::metrics::{BaseMetric, CacheMetrics, MetricType};

    #[test]
    fn header_then_indented_json() {
        let snapshot = MetricsSnapshot {
            memory: None,
            connection: None,
            cache: Some(CacheMetrics {
                base: BaseMetric::new(MetricType::Cache, "127.0.0.1:6379", Utc::now()),
                keyspace_hits: 80,
                keyspace_misses: 20,
                hit_rate: 80.0,
                evictions: 0,
                expired_keys: 0,
            }),
            collected_at: Utc::now(),
        };

        let mut buf = Vec::new();
        write_snapshot(&mut buf, 3, &snapshot).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("====== Metrics Collection 3 ======"));
        assert_eq!(lines.next(), Some("{"));
        assert!(text.contains("\n     \"cache\": {\n          \"timestamp\""));
        assert!(text.contains("\"hit_rate\": 80.0"));
        assert!(!text.contains("\"memory\""));
        assert!(text.ends_with("}\n"));

        let json_start = text.find('{').unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text[json_start..]).unwrap();
        assert_eq!(parsed["cache"]["keyspace_hits"], 80);
    }
}
