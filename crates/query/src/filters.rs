//! Filters (`filter:<name>`) and facets.

use quarry_core::names::{filter_key, FACET, FILTER_PREFIX};

use crate::{IntoValues, Query, Values};

impl Query {
    pub fn get_filter(&self, name: &str) -> Values { self.get_list(&filter_key(name)) }

    pub fn has_filter(&self, name: &str) -> bool { self.has(&filter_key(name)) }

    pub fn set_filter(&self, name: &str, value: impl IntoValues) -> Self {
        self.set(&filter_key(name), value)
    }

    pub fn toggle_filter(&self, name: &str, value: &str) -> Self {
        self.toggle(&filter_key(name), value)
    }

    pub fn add_filter(&self, name: &str, value: &str) -> Self { self.add(&filter_key(name), value) }

    pub fn remove_filter(&self, name: &str, value: &str) -> Self {
        self.remove(&filter_key(name), value)
    }

    pub fn clear_filter(&self, name: &str) -> Self { self.clear(&filter_key(name)) }

    /// Names of the filters set explicitly on this query.
    ///
    /// Filters that come only from the context are not listed: these are the
    /// filters a user can see and remove one by one. Cleared filters are
    /// skipped as well.
    pub fn filters(&self) -> Vec<String> {
        let ns = format!("{}{}", self.prefix(), FILTER_PREFIX);
        self.state()
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .filter_map(|(key, _)| key.strip_prefix(ns.as_str()))
            .map(str::to_string)
            .collect()
    }

    /// Fields facet counts are requested for.
    pub fn facets(&self) -> Values { self.get_list(FACET) }

    pub fn add_facet(&self, field: &str) -> Self { self.add(FACET, field) }

    pub fn clear_facets(&self) -> Self { self.set(FACET, Values::new()) }
}
