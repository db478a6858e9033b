//! Query operations as they are spelled on the command line.
//!
//! Each operation is `verb:argument`, e.g. `set:q=acme`, `filter:schema=Person`
//! or `sort:dates`. Names may themselves contain `:`; only the first one
//! separates the verb.

use std::str::FromStr;

use quarry_query::{Query, QueryError, QueryResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Set(String, String),
    Add(String, String),
    Remove(String, String),
    Toggle(String, String),
    Clear(String),
    /// Toggle one value of a filter.
    Filter(String, String),
    /// Clear a filter.
    Unfilter(String),
    Facet(String),
    ClearFacets,
    /// Three-state sort toggle.
    Sort(String),
    Limit(usize),
    Offset(usize),
}

impl Op {
    pub fn apply(&self, query: &Query) -> Query {
        match self {
            Op::Set(name, value) => query.set(name, value),
            Op::Add(name, value) => query.add(name, value),
            Op::Remove(name, value) => query.remove(name, value),
            Op::Toggle(name, value) => query.toggle(name, value),
            Op::Clear(name) => query.clear(name),
            Op::Filter(name, value) => query.toggle_filter(name, value),
            Op::Unfilter(name) => query.clear_filter(name),
            Op::Facet(name) => query.add_facet(name),
            Op::ClearFacets => query.clear_facets(),
            Op::Sort(field) => query.toggle_sort(field),
            Op::Limit(n) => query.limit(*n),
            Op::Offset(n) => query.offset(*n),
        }
    }
}

fn invalid(raw: &str) -> QueryError { QueryError::InvalidOperation(raw.to_string()) }

fn name_value(raw: &str, arg: &str) -> QueryResult<(String, String)> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(invalid(raw)),
    }
}

fn name(raw: &str, arg: &str) -> QueryResult<String> {
    if arg.is_empty() { Err(invalid(raw)) } else { Ok(arg.to_string()) }
}

fn count(raw: &str, arg: &str) -> QueryResult<usize> {
    arg.parse::<usize>().map_err(|_| invalid(raw))
}

impl FromStr for Op {
    type Err = QueryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw == "clear-facets" {
            return Ok(Op::ClearFacets);
        }
        let (verb, arg) = raw.split_once(':').ok_or_else(|| invalid(raw))?;
        let op = match verb {
            "set" => { let (n, v) = name_value(raw, arg)?; Op::Set(n, v) }
            "add" => { let (n, v) = name_value(raw, arg)?; Op::Add(n, v) }
            "remove" => { let (n, v) = name_value(raw, arg)?; Op::Remove(n, v) }
            "toggle" => { let (n, v) = name_value(raw, arg)?; Op::Toggle(n, v) }
            "filter" => { let (n, v) = name_value(raw, arg)?; Op::Filter(n, v) }
            "clear" => Op::Clear(name(raw, arg)?),
            "unfilter" => Op::Unfilter(name(raw, arg)?),
            "facet" => Op::Facet(name(raw, arg)?),
            "sort" => Op::Sort(name(raw, arg)?),
            "limit" => Op::Limit(count(raw, arg)?),
            "offset" => Op::Offset(count(raw, arg)?),
            _ => return Err(invalid(raw)),
        };
        Ok(op)
    }
}
