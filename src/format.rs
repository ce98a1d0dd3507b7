use chrono::{TimeZone, Utc};

pub const DEFAULT_HASH_PREVIEW: usize = 10;

/// Shorten a hash for display: the first `len` chars followed by `...`.
pub fn truncate_hash(hash: &str, len: usize) -> String {
    match hash.char_indices().nth(len) {
        Some((cut, _)) => format!("{}...", &hash[..cut]),
        None => hash.to_string(),
    }
}

/// Render a millisecond timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => millis.to_string(),
    }
}
