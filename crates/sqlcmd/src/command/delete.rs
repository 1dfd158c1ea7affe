use super::{Command, prepare_and_execute};
use crate::driver::Driver;
use crate::error::{CommandKind, SqlResult};
use crate::predicate::{Filter, WhereStatement};
use crate::strict::Strictness;
use crate::value::FieldMap;

/// DELETE command.
///
/// Without a predicate this deletes every row of the table. Only the
/// predicate's parameters are ever bound.
#[derive(Debug)]
pub struct Delete {
    table: String,
    filter: Filter,
    strictness: Strictness,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: Filter::new(),
            strictness: Strictness::default(),
        }
    }

    pub fn set_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    pub fn where_statement(&self) -> Option<&dyn WhereStatement> {
        self.filter.get()
    }

    pub fn set_where(&mut self, where_: impl WhereStatement + 'static) -> &mut Self {
        self.filter.set(where_);
        self
    }

    pub fn with_where(mut self, where_: impl WhereStatement + 'static) -> Self {
        self.filter.set(where_);
        self
    }

    pub fn clear_where(&mut self) -> &mut Self {
        self.filter.clear();
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

    fn build(&self) -> (String, FieldMap) {
        let mut sql = format!("DELETE FROM {}", self.table);
        let params = self.filter.render_into(&mut sql);
        (sql, params)
    }
}

impl Command for Delete {
    type Output = bool;

    fn kind(&self) -> CommandKind {
        CommandKind::Delete
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn sql(&self) -> SqlResult<String> {
        Ok(self.build().0)
    }

    /// The predicate's parameters.
    fn params(&self) -> FieldMap {
        self.build().1
    }

    fn is_strict(&self) -> bool {
        self.strictness.is_strict()
    }

    fn execute<D: Driver>(&self, driver: &D) -> SqlResult<bool> {
        let (sql, params) = self.build();
        let (statement, ok) = prepare_and_execute(driver, self.kind(), &sql, &params)?;
        if ok {
            self.strictness.check_command(&statement, CommandKind::Delete)?;
        }
        Ok(ok)
    }
}
