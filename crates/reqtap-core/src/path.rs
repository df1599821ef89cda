//! Route-label normalization.
//!
//! Raw request paths are high-cardinality (ids, tokens, query strings);
//! metric tags must not be. The normalizer strips the query string and
//! collapses `/` and `:` separators into `_`, yielding a stable label
//! such as `users_123` for `/users/123?active=true`.

/// Normalize a raw request path into a metric-safe label.
///
/// Returns `None` when the request exposes no path. Never fails for a
/// non-empty input.
pub fn normalized_path(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    Some(escape_separators(remove_query(raw)))
}

fn remove_query(s: &str) -> &str {
    match s.find('?') {
        Some(i) => &s[..i],
        None => s,
    }
}

fn escape_separators(s: &str) -> String {
    s.split(['/', ':'])
        .filter(|seg| !seg.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
