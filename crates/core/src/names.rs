//! Reserved field names and the namespaces built on them.

/// Single compound value `field:direction`.
pub const SORT: &str = "sort";
/// Multi-valued list of fields to compute facet counts for.
pub const FACET: &str = "facet";
/// Free-text query.
pub const QUERY_TEXT: &str = "q";
/// Name-prefix (autocomplete) query.
pub const QUERY_PREFIX: &str = "prefix";
pub const LIMIT: &str = "limit";
pub const OFFSET: &str = "offset";

pub const FILTER_PREFIX: &str = "filter:";
/// Only ever produced in outgoing params, by the facet rewrite.
pub const POST_FILTER_PREFIX: &str = "post_filter:";

pub fn filter_key(name: &str) -> String {
    format!("{FILTER_PREFIX}{name}")
}

pub fn post_filter_key(name: &str) -> String {
    format!("{POST_FILTER_PREFIX}{name}")
}

/// The filter name inside a `filter:` key, if it is one.
pub fn strip_filter(key: &str) -> Option<&str> {
    key.strip_prefix(FILTER_PREFIX)
}
