//! Quarry query state: an immutable search request.
//!
//! A [`Query`] combines three things:
//! - the explicit state, which is what the address bar shows;
//! - a read-only context (e.g. "always inside collection 4") merged into every read;
//! - a name prefix, so several independent queries can share one query string.
//!
//! Every operation borrows the receiver and returns a new `Query`.

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::Arc;

use quarry_core::names::{LIMIT, OFFSET, QUERY_PREFIX, QUERY_TEXT};
use quarry_core::normalize;

mod encode;
mod filters;
mod sort;

pub use quarry_core::{codec, names, IntoValues, Params, QueryError, QueryResult, Values};
pub use sort::{Sort, SortDirection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Explicit state, keyed by prefixed field name.
    state: Params,
    /// Fixed parameters, keyed by bare field name. Shared by every derived query.
    context: Arc<Params>,
    prefix: Arc<str>,
}

impl Default for Query {
    fn default() -> Self { Self::new(Params::new(), Params::new(), "") }
}

impl Query {
    pub fn new(state: Params, context: Params, prefix: impl Into<String>) -> Self {
        Self { state, context: Arc::new(context), prefix: Arc::from(prefix.into()) }
    }

    pub fn state(&self) -> &Params { &self.state }
    pub fn context(&self) -> &Params { &self.context }
    pub fn prefix(&self) -> &str { &self.prefix }

    fn key(&self, name: &str) -> String { format!("{}{}", self.prefix, name) }

    fn with_state(&self, state: Params) -> Self {
        Self { state, context: Arc::clone(&self.context), prefix: Arc::clone(&self.prefix) }
    }

    /// Context values for `name` followed by explicit ones, without duplicates.
    pub fn get_list(&self, name: &str) -> Values {
        let key = self.key(name);
        normalize(self.context.get(name).iter().chain(self.state.get(&key)).cloned())
    }

    /// First value of `name`, or an empty string.
    pub fn get_string(&self, name: &str) -> String {
        self.get_list(name).into_iter().next().unwrap_or_default()
    }

    pub fn has(&self, name: &str) -> bool { !self.get_list(name).is_empty() }

    /// Replace the explicit values of `name`. The context is left alone.
    pub fn set(&self, name: &str, value: impl IntoValues) -> Self {
        let mut state = self.state.clone();
        state.insert(self.key(name), value);
        self.with_state(state)
    }

    pub fn set_string(&self, name: &str, value: impl fmt::Display) -> Self {
        self.set(name, value.to_string())
    }

    /// Remove `value` if present, append it otherwise.
    pub fn toggle(&self, name: &str, value: &str) -> Self {
        let mut values = self.get_list(name);
        match values.iter().position(|v| v == value) {
            Some(pos) => {
                values.remove(pos);
            }
            None => values.push(value.to_string()),
        }
        self.set(name, values)
    }

    pub fn add(&self, name: &str, value: &str) -> Self {
        let mut values = self.get_list(name);
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
        self.set(name, values)
    }

    pub fn remove(&self, name: &str, value: &str) -> Self {
        let mut values = self.get_list(name);
        values.retain(|v| v != value);
        self.set(name, values)
    }

    /// Empty the explicit values of `name`. Context values stay visible.
    pub fn clear(&self, name: &str) -> Self { self.set(name, Values::new()) }

    /// Every field name known to this query: context names first, then the
    /// explicit ones under this query's prefix (prefix stripped).
    pub fn fields(&self) -> Vec<String> {
        let explicit = self.state.keys().filter_map(|k| k.strip_prefix(&*self.prefix));
        normalize(self.context.keys().chain(explicit)).into_vec()
    }

    /// Whether there is any free-text or name-prefix term to search for.
    pub fn has_query(&self) -> bool {
        !self.get_string(QUERY_TEXT).is_empty() || !self.get_string(QUERY_PREFIX).is_empty()
    }

    pub fn limit(&self, count: usize) -> Self { self.set(LIMIT, count) }

    pub fn offset(&self, count: usize) -> Self { self.set(OFFSET, count) }
}
