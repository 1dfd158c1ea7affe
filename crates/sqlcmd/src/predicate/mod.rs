//! WHERE clause compilation.
//!
//! A predicate is either one row of `field => value` conditions or a sequence
//! of such rows. [`ArrayWhere`] compiles it into a boolean SQL fragment with
//! named placeholders plus the matching parameter map:
//!
//! ```
//! use sqlcmd::{fields, ArrayWhere, WhereStatement};
//!
//! let w = ArrayWhere::new(vec![
//!     fields! { "id" => 1, "active" => false },
//!     fields! { "id" => 2, "active" => false },
//! ]);
//! let compiled = w.compile();
//! assert_eq!(
//!     compiled.sql,
//!     "((id = :id_1) and (active = :active_1)) or ((id = :id_2) and (active = :active_2))"
//! );
//! assert_eq!(compiled.params.len(), 4);
//! ```
//!
//! Placeholders are `<field>_<salt>`, where the salt is the 1-based index of
//! the row the condition belongs to, so a field repeated across rows never
//! produces the same placeholder twice.

mod array;
mod filter;

pub use array::ArrayWhere;
pub use filter::Filter;

use crate::value::FieldMap;
use std::fmt;
use std::str::FromStr;

/// Separator between a field name and its row salt in a placeholder.
pub const SALT_SEPARATOR: char = '_';

/// Boolean operator joining conditions or rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Operator::And),
            "or" => Ok(Operator::Or),
            other => Err(format!("unknown logical operator: {other}")),
        }
    }
}

/// The data a predicate is compiled from.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// One row of conditions joined by the field operator.
    Row(FieldMap),
    /// Rows joined by the row operator.
    Rows(Vec<FieldMap>),
}

impl Predicate {
    /// Number of field/value pairs across all rows.
    pub fn condition_count(&self) -> usize {
        match self {
            Predicate::Row(row) => row.len(),
            Predicate::Rows(rows) => rows.iter().map(FieldMap::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.condition_count() == 0
    }
}

impl From<FieldMap> for Predicate {
    fn from(row: FieldMap) -> Self {
        Predicate::Row(row)
    }
}

impl From<Vec<FieldMap>> for Predicate {
    fn from(rows: Vec<FieldMap>) -> Self {
        Predicate::Rows(rows)
    }
}

/// Output of a compilation: SQL fragment and placeholder => value map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub params: FieldMap,
}

/// Something that compiles to a WHERE fragment (without the `WHERE` keyword).
///
/// Implementations must be deterministic: compiling an unchanged value twice
/// yields the same fragment and parameters.
pub trait WhereStatement: Send + Sync {
    fn compile(&self) -> Compiled;

    /// Only the SQL fragment.
    fn statement(&self) -> String {
        self.compile().sql
    }

    /// Only the parameters.
    fn params(&self) -> FieldMap {
        self.compile().params
    }
}

/// A caller-written WHERE fragment with its parameters, bound as-is.
///
/// # Injection
///
/// The fragment is concatenated into the statement verbatim and is never
/// escaped. Pass values through the parameters, not inside the fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWhere {
    sql: String,
    params: FieldMap,
}

impl RawWhere {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: FieldMap::new(),
        }
    }

    pub fn with_params(mut self, params: FieldMap) -> Self {
        self.params = params;
        self
    }
}

impl WhereStatement for RawWhere {
    fn compile(&self) -> Compiled {
        Compiled {
            sql: self.sql.clone(),
            params: self.params.clone(),
        }
    }
}
