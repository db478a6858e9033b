//! Quarry core types: normalized field values, parameter maps and the
//! query-string codec they travel through.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

pub mod codec;
pub mod names;

/// Values of a single field. Most parameters carry one value, so two fit inline.
pub type Values = SmallVec<[String; 2]>;

/// Errors raised by the parsing entry points front ends use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("invalid sort direction: {0}")]
    InvalidSortDirection(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Collect strings into [`Values`], keeping the first occurrence of each.
pub fn normalize<I, S>(items: I) -> Values
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut out = Values::new();
    for item in items {
        let s: String = item.into();
        if seen.insert(s.clone()) {
            out.push(s);
        }
    }
    out
}

/// Anything that can be stored as the value of a field.
///
/// Scalars become single-element sequences, sequences are deduplicated and
/// numbers are stored in their decimal form.
pub trait IntoValues {
    fn into_values(self) -> Values;
}

impl IntoValues for &str {
    fn into_values(self) -> Values { smallvec![self.to_string()] }
}

impl IntoValues for String {
    fn into_values(self) -> Values { smallvec![self] }
}

impl IntoValues for &String {
    fn into_values(self) -> Values { smallvec![self.clone()] }
}

impl IntoValues for Values {
    fn into_values(self) -> Values { normalize(self) }
}

impl IntoValues for &Values {
    fn into_values(self) -> Values { normalize(self.iter().cloned()) }
}

impl IntoValues for Vec<String> {
    fn into_values(self) -> Values { normalize(self) }
}

impl IntoValues for Vec<&str> {
    fn into_values(self) -> Values { normalize(self) }
}

impl IntoValues for &[String] {
    fn into_values(self) -> Values { normalize(self.iter().cloned()) }
}

impl IntoValues for &[&str] {
    fn into_values(self) -> Values { normalize(self.iter().copied()) }
}

impl<const N: usize> IntoValues for [&str; N] {
    fn into_values(self) -> Values { normalize(self) }
}

impl<T: IntoValues> IntoValues for Option<T> {
    fn into_values(self) -> Values {
        match self {
            Some(v) => v.into_values(),
            None => Values::new(),
        }
    }
}

macro_rules! numeric_into_values {
    ($($t:ty),* $(,)?) => {
        $(impl IntoValues for $t {
            fn into_values(self) -> Values { smallvec![self.to_string()] }
        })*
    };
}

numeric_into_values!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Mapping of parameter name to its values, ordered by name.
///
/// Every write goes through [`IntoValues`], so stored sequences never hold
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    entries: BTreeMap<String, Values>,
}

impl Params {
    pub fn new() -> Self { Self::default() }

    /// Parse a query string (see [`codec::parse`]).
    pub fn parse(input: &str) -> Self { codec::parse(input) }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn contains_key(&self, name: &str) -> bool { self.entries.contains_key(name) }

    /// Stored values for `name`; empty when absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.entries.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Replace the values of `name`.
    pub fn insert(&mut self, name: impl Into<String>, values: impl IntoValues) {
        self.entries.insert(name.into(), values.into_values());
    }

    /// Add one value to `name`, creating the entry if needed.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let slot = self.entries.entry(name.into()).or_default();
        if !slot.contains(&value) {
            slot.push(value);
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Values> { self.entries.remove(name) }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::stringify(self))
    }
}

impl<K: Into<String>, V: IntoValues> FromIterator<(K, V)> for Params {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Params::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: IntoValues> Extend<(K, V)> for Params {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_first_occurrence() {
        let v = normalize(vec!["b", "a", "b", "c", "a"]);
        assert_eq!(v.as_slice(), ["b", "a", "c"]);
    }

    #[test]
    fn scalars_and_numbers_become_single_values() {
        assert_eq!("x".into_values().as_slice(), ["x"]);
        assert_eq!(String::from("y").into_values().as_slice(), ["y"]);
        assert_eq!(30usize.into_values().as_slice(), ["30"]);
        assert_eq!((-2i64).into_values().as_slice(), ["-2"]);
        assert!(None::<&str>.into_values().is_empty());
    }

    #[test]
    fn insert_dedups_and_append_accumulates() {
        let mut p = Params::new();
        p.insert("facet", ["countries", "schema", "countries"]);
        assert_eq!(p.get("facet"), ["countries", "schema"]);
        p.append("facet", "schema");
        p.append("facet", "dates");
        assert_eq!(p.get("facet"), ["countries", "schema", "dates"]);
        assert!(p.get("missing").is_empty());
        assert!(!p.contains_key("missing"));
    }

    #[test]
    fn collects_from_pairs() {
        let p: Params = vec![("q", vec!["a"]), ("filter:schema", vec!["Person", "Company"])]
            .into_iter()
            .collect();
        assert_eq!(p.len(), 2);
        assert_eq!(p.keys().collect::<Vec<_>>(), vec!["filter:schema", "q"]);
    }

    #[test]
    fn serializes_as_object_of_arrays() {
        let mut p = Params::new();
        p.insert("q", "tax");
        p.insert("facet", ["countries"]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"facet":["countries"],"q":["tax"]}"#);
        let back: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
