use super::{Command, execution_failed, prepare_and_execute};
use crate::driver::Driver;
use crate::error::{CommandKind, SqlError, SqlResult};
use crate::strict::Strictness;
use crate::value::{FieldMap, Value};

/// INSERT command.
///
/// Columns and placeholders follow the data map's insertion order; each
/// placeholder is named after its column. On success returns the
/// driver-generated id.
///
/// The id is whatever [`Driver::last_insert_id`] reports for the connection,
/// not something tied to this table. With [`PgDriver`](crate::pg::PgDriver)
/// that is `LASTVAL()`: inserting into a table without a sequence returns the
/// value of the last sequence used in the session, possibly another table's.
#[derive(Debug, Clone)]
pub struct Create {
    table: String,
    data: FieldMap,
    strictness: Strictness,
}

impl Create {
    pub fn new(table: impl Into<String>, data: FieldMap) -> Self {
        Self {
            table: table.into(),
            data,
            strictness: Strictness::default(),
        }
    }

    pub fn set_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    pub fn set_data(&mut self, data: FieldMap) -> &mut Self {
        self.data = data;
        self
    }

    pub fn set_strict(&mut self, strict: bool) -> &mut Self {
        self.strictness.set_strict(strict);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strictness.set_strict(strict);
        self
    }
}

impl Command for Create {
    type Output = Value;

    fn kind(&self) -> CommandKind {
        CommandKind::Create
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn sql(&self) -> SqlResult<String> {
        if self.data.is_empty() {
            return Err(SqlError::EmptyDataset);
        }

        let columns: Vec<&str> = self.data.keys().map(String::as_str).collect();
        Ok(format!(
            "INSERT INTO {} ({}) VALUES (:{})",
            self.table,
            columns.join(", "),
            columns.join(", :")
        ))
    }

    fn params(&self) -> FieldMap {
        self.data.clone()
    }

    fn data(&self) -> SqlResult<&FieldMap> {
        Ok(&self.data)
    }

    fn is_strict(&self) -> bool {
        self.strictness.is_strict()
    }

    fn execute<D: Driver>(&self, driver: &D) -> SqlResult<Value> {
        let sql = self.sql()?;
        let (statement, ok) = prepare_and_execute(driver, self.kind(), &sql, &self.data)?;
        if !ok {
            return Err(execution_failed(&statement));
        }
        self.strictness.check_command(&statement, CommandKind::Create)?;
        Ok(driver.last_insert_id()?)
    }
}
