//! The four data-access commands.
//!
//! Each command turns a table name and field data (plus an optional predicate)
//! into SQL with named placeholders, and runs it through a [`Driver`]:
//!
//! ```ignore
//! use sqlcmd::{command, fields, ArrayWhere, Command};
//!
//! // INSERT INTO users (name, email) VALUES (:name, :email)
//! let id = command::create("users", fields! { "name" => "alice", "email" => "a@x.io" })
//!     .execute(&driver)?;
//!
//! // SELECT id, name FROM users WHERE (id = :id_1)
//! let rows = command::select("users")
//!     .with_fields(["id", "name"])
//!     .with_where(ArrayWhere::new(fields! { "id" => id }))
//!     .execute(&driver)?;
//!
//! // UPDATE users SET name = :name WHERE (id = :id_1)
//! command::update("users", fields! { "name" => "bob" })
//!     .with_where(ArrayWhere::new(fields! { "id" => id }))
//!     .strict(true)
//!     .execute(&driver)?;
//!
//! // DELETE FROM users WHERE (id = :id_1)
//! command::delete("users")
//!     .with_where(ArrayWhere::new(fields! { "id" => id }))
//!     .execute(&driver)?;
//! ```

mod create;
mod delete;
mod select;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use select::{FetchConfig, FetchMode, Fetched, Select};
pub use update::Update;

use crate::driver::{Driver, Statement};
use crate::error::{CommandKind, SqlError, SqlResult};
use crate::value::FieldMap;

/// Common surface of Create, Select, Update and Delete.
pub trait Command {
    /// What a successful `execute` returns.
    type Output;

    fn kind(&self) -> CommandKind;

    fn table(&self) -> &str;

    /// SQL text ready to be prepared.
    ///
    /// Pure function of the command's current state; may be called repeatedly.
    fn sql(&self) -> SqlResult<String>;

    /// The exact parameter set bound on execution.
    fn params(&self) -> FieldMap;

    /// The command's own field data.
    ///
    /// Only commands that carry a dataset support this; the rest report
    /// [`SqlError::MethodNotApplicable`].
    fn data(&self) -> SqlResult<&FieldMap> {
        Err(SqlError::method_not_applicable(self.kind(), "data"))
    }

    fn is_strict(&self) -> bool;

    /// Prepare, bind and run the statement.
    fn execute<D: Driver>(&self, driver: &D) -> SqlResult<Self::Output>;
}

/// Create an INSERT command.
pub fn create(table: impl Into<String>, data: FieldMap) -> Create {
    Create::new(table, data)
}

/// Create a SELECT command.
pub fn select(table: impl Into<String>) -> Select {
    Select::new(table)
}

/// Create an UPDATE command.
pub fn update(table: impl Into<String>, data: FieldMap) -> Update {
    Update::new(table, data)
}

/// Create a DELETE command.
pub fn delete(table: impl Into<String>) -> Delete {
    Delete::new(table)
}

/// Prepare `sql` and execute it, binding `params` only when there are any.
fn prepare_and_execute<'d, D: Driver>(
    driver: &'d D,
    kind: CommandKind,
    sql: &str,
    params: &FieldMap,
) -> SqlResult<(D::Statement<'d>, bool)> {
    tracing::debug!(
        target: "sqlcmd.sql",
        command = %kind,
        param_count = params.len(),
        sql = %sql,
        "executing"
    );

    let mut statement = driver.prepare(sql)?;
    let bound = if params.is_empty() { None } else { Some(params) };
    let ok = statement.execute(bound)?;
    Ok((statement, ok))
}

/// Error for an `execute` that returned `false` without raising.
fn execution_failed<S: Statement>(statement: &S) -> SqlError {
    SqlError::execution(
        statement
            .error_info()
            .unwrap_or_else(|| "statement execution failed".to_string()),
    )
}

#[cfg(test)]
mod tests;
