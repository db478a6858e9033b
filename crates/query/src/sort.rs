//! Single-field sort stored as `field:direction` in the `sort` field.

use std::fmt;
use std::str::FromStr;

use quarry_core::names::SORT;
use serde::{Deserialize, Serialize};

use crate::{Query, QueryError, Values};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(QueryError::InvalidSortDirection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    /// Decode a stored `field:direction` value. Anything but a `desc` suffix,
    /// including no suffix at all, sorts ascending.
    fn decode(raw: &str) -> Self {
        match raw.rsplit_once(':') {
            Some((field, dir)) => Sort {
                field: field.to_string(),
                direction: if dir == "desc" { SortDirection::Desc } else { SortDirection::Asc },
            },
            None => Sort { field: raw.to_string(), direction: SortDirection::Asc },
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction)
    }
}

impl Query {
    /// The active sort, if any. Only the first stored value is considered.
    pub fn get_sort(&self) -> Option<Sort> {
        self.get_list(SORT)
            .first()
            .map(|raw| Sort::decode(raw))
            .filter(|s| !s.field.is_empty())
    }

    /// Sort by `field`, or remove sorting when no field is given.
    pub fn sort_by(&self, field: Option<&str>, direction: SortDirection) -> Self {
        match field.filter(|f| !f.is_empty()) {
            Some(field) => {
                let sort = Sort { field: field.to_string(), direction };
                self.set(SORT, sort.to_string())
            }
            None => self.set(SORT, Values::new()),
        }
    }

    /// Step `field` through ascending, descending and unsorted.
    /// Picking a different field always starts at ascending.
    pub fn toggle_sort(&self, field: &str) -> Self {
        match self.get_sort() {
            Some(current) if current.field == field => match current.direction {
                SortDirection::Asc => self.sort_by(Some(field), SortDirection::Desc),
                SortDirection::Desc => self.sort_by(None, SortDirection::Asc),
            },
            _ => self.sort_by(Some(field), SortDirection::Asc),
        }
    }
}
