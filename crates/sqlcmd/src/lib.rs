//! # sqlcmd
//!
//! Small data-access layer that compiles CRUD commands into SQL with named
//! placeholders and runs them through a pluggable driver.
//!
//! ## Features
//!
//! - **Commands**: `create`, `select`, `update` and `delete` over a table name and field data
//! - **Predicates**: `ArrayWhere` compiles rows of conditions with collision-free placeholders
//! - **Strict mode**: optionally treat "zero rows affected" as an error
//! - **Driver seam**: any database speaking named parameters can implement `Driver`
//! - **Postgres**: a blocking `tokio-postgres` driver behind the `postgres` feature
//!
//! ## Commands
//!
//! ```ignore
//! use sqlcmd::{fields, ArrayWhere, Command, PgDriver};
//!
//! let driver = PgDriver::connect_env()?;
//!
//! // INSERT
//! let id = sqlcmd::create("users", fields! { "name" => "alice" }).execute(&driver)?;
//!
//! // SELECT
//! let users = sqlcmd::select("users")
//!     .with_where(ArrayWhere::new(fields! { "id" => id.clone() }))
//!     .execute(&driver)?;
//!
//! // UPDATE
//! sqlcmd::update("users", fields! { "name" => "bob" })
//!     .with_where(ArrayWhere::new(fields! { "id" => id.clone() }))
//!     .strict(true)
//!     .execute(&driver)?;
//!
//! // DELETE
//! sqlcmd::delete("users")
//!     .with_where(ArrayWhere::new(fields! { "id" => id }))
//!     .execute(&driver)?;
//! ```

pub mod command;
pub mod driver;
pub mod error;
pub mod predicate;
pub mod strict;
pub mod value;

#[cfg(feature = "postgres")]
pub mod pg;

pub use command::{
    Command, Create, Delete, FetchConfig, FetchMode, Fetched, Select, Update, create, delete,
    select, update,
};
pub use driver::{Driver, FetchStyle, Statement};
pub use error::{CommandKind, DriverError, ErrorKind, SqlError, SqlResult};
pub use predicate::{
    ArrayWhere, Compiled, Filter, Operator, Predicate, RawWhere, SALT_SEPARATOR, WhereStatement,
};
pub use strict::Strictness;
pub use value::{FieldMap, Row, Value};

#[cfg(feature = "postgres")]
pub use pg::{PgDriver, PgDriverConfig, PgStatement};
