//! Blocking Postgres driver over `tokio-postgres`.
//!
//! [`PgDriver`] owns a current-thread runtime and blocks on it for every
//! call, which lets the synchronous commands run against Postgres:
//!
//! ```ignore
//! use sqlcmd::{fields, Command, PgDriver, PgDriverConfig};
//!
//! let driver = PgDriver::connect(&PgDriverConfig::from_env()?.application_name("jobs"))?;
//! let id = sqlcmd::create("jobs", fields! { "name" => "nightly" }).execute(&driver)?;
//! ```
//!
//! Named `:placeholders` are rewritten to `$n` at prepare time.

mod config;
mod convert;
mod named;

pub use config::{DATABASE_URL_ENV, PgDriverConfig};

use crate::driver::{Driver, FetchStyle, Statement};
use crate::error::DriverError;
use crate::value::{FieldMap, Row, Value};
use std::collections::VecDeque;
use std::fmt;
use tokio::runtime::{Builder, Runtime};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};

/// A single Postgres connection driven synchronously.
pub struct PgDriver {
    runtime: Runtime,
    client: Client,
}

impl PgDriver {
    /// Connect with `NoTls`.
    pub fn connect(config: &PgDriverConfig) -> Result<Self, DriverError> {
        let pg_config = config.to_pg_config()?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DriverError::new(format!("failed to start runtime: {e}")).with_source(e))?;

        let (client, connection) = runtime.block_on(pg_config.connect(NoTls))?;
        runtime.spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "sqlcmd.pg", error = %e, "connection error");
            }
        });

        tracing::debug!(
            target: "sqlcmd.pg",
            dbname = pg_config.get_dbname().unwrap_or_default(),
            application_name = config.application_name.as_deref().unwrap_or_default(),
            "connected"
        );

        Ok(Self { runtime, client })
    }

    /// Connect to `database_url` with default settings.
    pub fn connect_url(database_url: &str) -> Result<Self, DriverError> {
        Self::connect(&PgDriverConfig::new(database_url))
    }

    /// Connect using [`PgDriverConfig::from_env`].
    pub fn connect_env() -> Result<Self, DriverError> {
        Self::connect(&PgDriverConfig::from_env()?)
    }

    /// Run one or more statements without parameters, e.g. DDL.
    pub fn batch_execute(&self, sql: &str) -> Result<(), DriverError> {
        self.runtime.block_on(self.client.batch_execute(sql))?;
        Ok(())
    }

    /// The underlying async client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl fmt::Debug for PgDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgDriver")
            .field("closed", &self.client.is_closed())
            .finish()
    }
}

impl Driver for PgDriver {
    type Statement<'a> = PgStatement<'a>;

    fn prepare(&self, sql: &str) -> Result<PgStatement<'_>, DriverError> {
        let positional = named::rewrite(sql);
        tracing::trace!(target: "sqlcmd.pg", sql = %positional.sql, "prepare");
        let statement = self.runtime.block_on(self.client.prepare(&positional.sql))?;

        Ok(PgStatement {
            driver: self,
            statement,
            names: positional.names,
            rows: VecDeque::new(),
            affected: 0,
            error: None,
        })
    }

    /// `SELECT LASTVAL()`: the value most recently produced by a sequence in
    /// this session.
    ///
    /// Not scoped to a table. After an insert into a table without a sequence
    /// this still returns the earlier sequence value, and it fails if no
    /// sequence has been used on the connection yet.
    fn last_insert_id(&self) -> Result<Value, DriverError> {
        let row = self
            .runtime
            .block_on(self.client.query_one("SELECT LASTVAL()", &[]))?;
        let id: i64 = row.try_get(0)?;
        Ok(Value::Int(id))
    }
}

/// A prepared statement bound to its [`PgDriver`].
///
/// Rows returned by the last execution are buffered and handed out by the
/// fetch methods.
pub struct PgStatement<'a> {
    driver: &'a PgDriver,
    statement: tokio_postgres::Statement,
    names: Vec<String>,
    rows: VecDeque<tokio_postgres::Row>,
    affected: u64,
    error: Option<String>,
}

impl PgStatement<'_> {
    fn run(&mut self, params: &[&(dyn ToSql + Sync)]) -> Result<(), tokio_postgres::Error> {
        let PgDriver { runtime, client } = self.driver;
        if self.statement.columns().is_empty() {
            self.affected = runtime.block_on(client.execute(&self.statement, params))?;
        } else {
            let rows = runtime.block_on(client.query(&self.statement, params))?;
            self.affected = rows.len() as u64;
            self.rows = rows.into();
        }
        Ok(())
    }
}

impl fmt::Debug for PgStatement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgStatement")
            .field("names", &self.names)
            .field("buffered", &self.rows.len())
            .field("affected", &self.affected)
            .finish()
    }
}

impl Statement for PgStatement<'_> {
    fn execute(&mut self, params: Option<&FieldMap>) -> Result<bool, DriverError> {
        self.rows.clear();
        self.affected = 0;
        self.error = None;

        let values = named::bind(&self.names, params)?;
        let refs: Vec<&(dyn ToSql + Sync)> = values
            .iter()
            .map(|v| *v as &(dyn ToSql + Sync))
            .collect();

        match self.run(&refs) {
            Ok(()) => Ok(true),
            Err(e) => {
                let err = DriverError::from(e);
                self.error = Some(err.message().to_string());
                Err(err)
            }
        }
    }

    fn affected_rows(&self) -> u64 {
        self.affected
    }

    fn fetch_one(&mut self, style: FetchStyle) -> Result<Option<Row>, DriverError> {
        match self.rows.pop_front() {
            Some(row) => Ok(Some(convert::decode_row(&row, style)?)),
            None => Ok(None),
        }
    }

    fn fetch_all(&mut self, style: FetchStyle) -> Result<Vec<Row>, DriverError> {
        let rows = std::mem::take(&mut self.rows);
        let decoded = rows
            .iter()
            .map(|row| convert::decode_row(row, style))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(decoded)
    }

    fn error_info(&self) -> Option<String> {
        self.error.clone()
    }
}
