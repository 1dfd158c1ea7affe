use super::{Command, prepare_and_execute};
use crate::driver::Driver;
use crate::error::{CommandKind, SqlError, SqlResult};
use crate::predicate::{Filter, WhereStatement};
use crate::strict::Strictness;
use crate::value::FieldMap;

/// UPDATE command.
///
/// Binds the SET data overlaid with the predicate's parameters: on a key
/// collision the predicate value wins and the key keeps its SET position.
#[derive(Debug)]
pub struct Update {
    table: String,
    data: FieldMap,
    filter: Filter,
    strictness: Strictness,
}

impl Update {
    pub fn new(table: impl Into<String>, data: FieldMap) -> Self {
        Self {
            table: table.into(),
            data,
            filter: Filter::new(),
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

    /// SET data first, predicate parameters overlaid on top.
    pub fn combined_data(&self) -> FieldMap {
        let where_data = self.filter.compile().map(|c| c.params).unwrap_or_default();
        merge(&self.data, where_data)
    }

    fn build(&self) -> SqlResult<(String, FieldMap)> {
        if self.data.is_empty() {
            return Err(SqlError::EmptyDataset);
        }

        let sets: Vec<String> = self
            .data
            .keys()
            .map(|column| format!("{column} = :{column}"))
            .collect();
        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));
        let where_data = self.filter.render_into(&mut sql);
        Ok((sql, merge(&self.data, where_data)))
    }
}

fn merge(data: &FieldMap, overlay: FieldMap) -> FieldMap {
    let mut combined = data.clone();
    combined.extend(overlay);
    combined
}

impl Command for Update {
    type Output = bool;

    fn kind(&self) -> CommandKind {
        CommandKind::Update
    }

    fn table(&self) -> &str {
        &self.table
    }

    /// Fails with [`SqlError::EmptyDataset`] when there is nothing to SET.
    fn sql(&self) -> SqlResult<String> {
        Ok(self.build()?.0)
    }

    fn params(&self) -> FieldMap {
        self.combined_data()
    }

    fn data(&self) -> SqlResult<&FieldMap> {
        Ok(&self.data)
    }

    fn is_strict(&self) -> bool {
        self.strictness.is_strict()
    }

    fn execute<D: Driver>(&self, driver: &D) -> SqlResult<bool> {
        let (sql, params) = self.build()?;
        let (statement, ok) = prepare_and_execute(driver, self.kind(), &sql, &params)?;
        if ok {
            self.strictness.check_command(&statement, CommandKind::Update)?;
        }
        Ok(ok)
    }
}
