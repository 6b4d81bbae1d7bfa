use std::collections::HashMap;

/// Turns one `INFO` reply into a `field -> raw value` map.
///
/// The reply is a block of `key:value` lines split into sections by
/// `# Section` headers. Parsing is best-effort and never fails: blank
/// lines, headers and anything that is not exactly `key:value` are
/// dropped, because the field set differs across server versions.
/// A key that appears twice keeps its last value.
pub fn parse_info(text: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split(':');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };

        fields.insert(key.trim().to_owned(), value.trim().to_owned());
    }

    fields
}

/// Reads a counter from a parsed reply. Absent or non-integer values
/// read as 0 so one odd field never costs the whole record.
pub fn field_u64(fields: &HashMap<String, String>, key: &str) -> u64 {
    let Some(raw) = fields.get(key) else {
        return 0;
    };

    raw.parse().unwrap_or_else(|_| {
        tracing::trace!(field = key, value = %raw, "non-integer INFO field, using 0");
        0
    })
}
