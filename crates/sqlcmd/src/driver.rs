//! Driver contract consumed by the commands.
//!
//! Commands never talk to a database directly. They prepare SQL with named
//! `:placeholders` through a [`Driver`] and bind parameters by name on the
//! returned [`Statement`].

use crate::error::DriverError;
use crate::value::{FieldMap, Row, Value};

/// How fetched rows are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStyle {
    /// Keyed by column name.
    #[default]
    Assoc,
    /// Keyed by 0-based column position (`"0"`, `"1"`, ...).
    Num,
}

/// A relational database connection.
///
/// Implementations are synchronous: any I/O blocks inside the call.
pub trait Driver {
    type Statement<'a>: Statement
    where
        Self: 'a;

    /// Prepare a statement.
    fn prepare(&self, sql: &str) -> Result<Self::Statement<'_>, DriverError>;

    /// Identifier generated by the most recent insert on this connection.
    fn last_insert_id(&self) -> Result<Value, DriverError>;
}

/// A prepared statement.
pub trait Statement {
    /// Execute with named parameters, or with none.
    ///
    /// `Ok(false)` reports a failure the driver chose not to raise; see
    /// [`Statement::error_info`].
    fn execute(&mut self, params: Option<&FieldMap>) -> Result<bool, DriverError>;

    /// Rows affected (or returned) by the last execution.
    fn affected_rows(&self) -> u64;

    /// Next row, if any.
    fn fetch_one(&mut self, style: FetchStyle) -> Result<Option<Row>, DriverError>;

    /// All remaining rows.
    fn fetch_all(&mut self, style: FetchStyle) -> Result<Vec<Row>, DriverError>;

    /// Message describing why the last `execute` returned `false`.
    fn error_info(&self) -> Option<String> {
        None
    }
}
