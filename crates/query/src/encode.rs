//! Location and params encodings.
//!
//! The location encoding carries the explicit state only and is what goes
//! into the address bar. The params encoding merges in the context and
//! rewrites faceted filters into post-filters; it is what goes to the backend.

use std::fmt;

use metrics::counter;
use quarry_core::names::{filter_key, post_filter_key, FACET};
use quarry_core::{codec, normalize};
use tracing::{debug, trace};

use crate::{Params, Query};

impl Query {
    /// Build a query from the search portion of a URL.
    pub fn from_location(search: &str, context: Params, prefix: impl Into<String>) -> Self {
        let state = codec::parse(search);
        let query = Self::new(state, context, prefix);
        debug!(fields = query.state().len(), prefix = %query.prefix(), "query parsed from location");
        query
    }

    /// Query string of the explicit state, keys as stored. Never includes the context.
    pub fn to_location(&self) -> String { codec::stringify(self.state()) }

    /// Full parameter set for a backend request.
    ///
    /// Every field is resolved through [`Query::get_list`] and stored under its
    /// bare name. Then, for each faceted field `F`, `filter:F` is folded into
    /// `post_filter:F`, so the facet counts for `F` are computed without the
    /// filter on `F` while result rows are still filtered by it.
    ///
    /// Fields with an empty list keep their (empty) entry, the rewritten
    /// `post_filter:F` included; the query-string form drops them.
    pub fn to_params(&self) -> Params {
        let mut params: Params = self
            .fields()
            .into_iter()
            .map(|name| {
                let values = self.get_list(&name);
                (name, values)
            })
            .collect();

        let mut rewrites = 0u64;
        for facet in self.get_list(FACET) {
            let src = filter_key(&facet);
            let dst = post_filter_key(&facet);
            let merged = normalize(params.get(&src).iter().chain(params.get(&dst)).cloned());
            params.remove(&src);
            if !merged.is_empty() {
                trace!(facet = %facet, values = merged.len(), "filter promoted to post-filter");
                rewrites += 1;
            }
            params.insert(dst, merged);
        }
        if rewrites > 0 {
            counter!("query_post_filter_rewrites_total", rewrites);
        }
        params
    }

    /// Same location and same context. The prefix only matters through the
    /// keys it produced.
    pub fn same_as(&self, other: &Query) -> bool {
        self.to_location() == other.to_location() && self.context().to_string() == other.context().to_string()
    }
}

/// The params encoding as a query string.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::stringify(&self.to_params()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_excludes_context() {
        let context = Params::parse("filter:collection_id=4");
        let q = Query::from_location("?q=acme", context, "");
        assert_eq!(q.to_location(), "q=acme");
        assert_eq!(q.to_string(), "filter%3Acollection_id=4&q=acme");
    }

    #[test]
    fn faceted_filters_become_post_filters() {
        let q = Query::default()
            .set_filter("countries", "us")
            .set_filter("schema", "Person")
            .add_facet("countries");
        let params = q.to_params();
        assert_eq!(params.get("post_filter:countries"), ["us"]);
        assert!(!params.contains_key("filter:countries"));
        assert_eq!(params.get("filter:schema"), ["Person"]);
        assert_eq!(params.get("facet"), ["countries"]);
    }

    #[test]
    fn rewrite_unions_with_existing_post_filter() {
        let q = Query::default()
            .set("post_filter:countries", ["gb", "us"])
            .set_filter("countries", ["us", "fr"])
            .add_facet("countries");
        let params = q.to_params();
        assert_eq!(params.get("post_filter:countries"), ["us", "fr", "gb"]);
        assert!(!params.contains_key("filter:countries"));
    }

    #[test]
    fn facet_without_filter_leaves_empty_post_filter() {
        let q = Query::default().add_facet("dates");
        let params = q.to_params();
        assert!(params.contains_key("post_filter:dates"));
        assert!(params.get("post_filter:dates").is_empty());
        assert!(!params.contains_key("filter:dates"));
        assert_eq!(q.to_string(), "facet=dates");
    }

    #[test]
    fn cleared_fields_keep_empty_entries() {
        let q = Query::default().set_filter("schema", "Email").clear_filter("schema").clear("q");
        let params = q.to_params();
        assert!(params.contains_key("filter:schema"));
        assert!(params.get("filter:schema").is_empty());
        assert!(params.contains_key("q"));

        let params = q.add_facet("schema").to_params();
        assert!(!params.contains_key("filter:schema"));
        assert!(params.contains_key("post_filter:schema"));
        assert!(params.get("post_filter:schema").is_empty());
    }

    #[test]
    fn to_params_is_repeatable() {
        let q = Query::new(Params::parse("filter:countries=us&facet=countries&q=acme"), Params::parse("collection_id=3"), "");
        let first = q.to_params();
        assert_eq!(q.to_params(), first);
        assert_eq!(q.to_string(), q.to_string());
        assert_eq!(first.get("post_filter:countries"), ["us"]);
    }

    #[test]
    fn rewrite_sees_context_filters() {
        let context = Params::parse("filter%3Aschema=Document");
        let q = Query::new(Params::new(), context, "").add_facet("schema");
        let params = q.to_params();
        assert_eq!(params.get("post_filter:schema"), ["Document"]);
        assert!(!params.contains_key("filter:schema"));
    }

    #[test]
    fn params_use_bare_names_under_prefix() {
        let q = Query::from_location("?ents.q=acme&docs.q=memo", Params::new(), "ents.");
        let params = q.to_params();
        assert_eq!(params.get("q"), ["acme"]);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn same_as_compares_location_and_context() {
        let a = Query::from_location("?q=x&limit=10", Params::parse("collection_id=1"), "");
        let b = Query::from_location("limit=10&q=x", Params::parse("collection_id=1"), "");
        let c = Query::from_location("limit=10&q=x", Params::parse("collection_id=2"), "");
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
        assert!(!a.same_as(&a.offset(10)));
    }
}
