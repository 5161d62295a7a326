//! Partner-id codec: the delimited-string form partner ids travel in.
//!
//! Two encode forms exist on purpose. The list endpoint has always
//! rendered ids with `", "` while the write path persists them with a
//! bare `","`; both are kept to stay wire-compatible with existing
//! clients rather than silently normalized.

/// Join ids with `", "` — the display form used by the list endpoint.
pub fn encode_display(ids: &[i64]) -> String {
    join(ids, ", ")
}

/// Join ids with `","` — the storage form persisted on contract rows.
pub fn encode_storage(ids: &[i64]) -> String {
    join(ids, ",")
}

fn join(ids: &[i64], sep: &str) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Parse a comma-separated id string.
///
/// Tokens are trimmed before parsing; tokens that are empty or fail to
/// parse as integers are silently discarded. Malformed input is never
/// an error at this layer — the result may simply be empty.
pub fn decode(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<i64>().ok())
        .collect()
}
