use super::{Command, execution_failed, prepare_and_execute};
use crate::driver::{Driver, FetchStyle, Statement};
use crate::error::{CommandKind, SqlResult};
use crate::predicate::{Filter, WhereStatement};
use crate::strict::Strictness;
use crate::value::{FieldMap, Row};

/// Whether a SELECT returns one row or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// First row only.
    Flat,
    /// Every matching row.
    #[default]
    Full,
}

/// Fetch configuration for [`Select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchConfig {
    pub style: FetchStyle,
    pub mode: FetchMode,
}

impl FetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(mut self, style: FetchStyle) -> Self {
        self.style = style;
        self
    }

    pub fn mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for [`FetchMode::Flat`].
    pub fn flat(self) -> Self {
        self.mode(FetchMode::Flat)
    }
}

/// Result of a [`Select`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    Row(Row),
    Rows(Vec<Row>),
}

impl Default for Fetched {
    fn default() -> Self {
        Fetched::Rows(Vec::new())
    }
}

impl Fetched {
    pub fn is_empty(&self) -> bool {
        match self {
            Fetched::Row(row) => row.is_empty(),
            Fetched::Rows(rows) => rows.is_empty(),
        }
    }

    /// Flatten into a list of rows.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Fetched::Row(row) => vec![row],
            Fetched::Rows(rows) => rows,
        }
    }

    /// The first row, if any.
    pub fn into_row(self) -> Option<Row> {
        match self {
            Fetched::Row(row) => Some(row),
            Fetched::Rows(rows) => rows.into_iter().next(),
        }
    }
}

/// SELECT command.
///
/// Projects `*` unless fields are set. When the driver yields nothing (no row,
/// an empty row, or no rows) the configured default value is returned instead,
/// so "no rows" and "default requested" look the same to the caller.
#[derive(Debug)]
pub struct Select {
    table: String,
    fields: Vec<String>,
    filter: Filter,
    fetch: FetchConfig,
    default_value: Fetched,
    strictness: Strictness,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: vec!["*".to_string()],
            filter: Filter::new(),
            fetch: FetchConfig::default(),
            default_value: Fetched::default(),
            strictness: Strictness::default(),
        }
    }

    pub fn set_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Set the projection. An empty list means `*`.
    pub fn set_fields<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        if self.fields.is_empty() {
            self.fields.push("*".to_string());
        }
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_fields(fields);
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

    pub fn fetch_config(&self) -> FetchConfig {
        self.fetch
    }

    pub fn set_fetch_config(&mut self, fetch: FetchConfig) -> &mut Self {
        self.fetch = fetch;
        self
    }

    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Switch between [`FetchMode::Flat`] and [`FetchMode::Full`].
    pub fn set_fetch_flat(&mut self, flat: bool) -> &mut Self {
        self.fetch.mode = if flat { FetchMode::Flat } else { FetchMode::Full };
        self
    }

    pub fn default_value(&self) -> &Fetched {
        &self.default_value
    }

    pub fn set_default_value(&mut self, value: Fetched) -> &mut Self {
        self.default_value = value;
        self
    }

    pub fn with_default_value(mut self, value: Fetched) -> Self {
        self.default_value = value;
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
        let mut sql = format!("SELECT {} FROM {}", self.fields.join(", "), self.table);
        let params = self.filter.render_into(&mut sql);
        (sql, params)
    }

    fn fetch<S: Statement>(&self, statement: &mut S) -> SqlResult<Option<Fetched>> {
        let style = self.fetch.style;
        let fetched = match self.fetch.mode {
            FetchMode::Flat => statement
                .fetch_one(style)?
                .filter(|row| !row.is_empty())
                .map(Fetched::Row),
            FetchMode::Full => Some(statement.fetch_all(style)?)
                .filter(|rows| !rows.is_empty())
                .map(Fetched::Rows),
        };
        Ok(fetched)
    }
}

impl Command for Select {
    type Output = Fetched;

    fn kind(&self) -> CommandKind {
        CommandKind::Select
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn sql(&self) -> SqlResult<String> {
        Ok(self.build().0)
    }

    fn params(&self) -> FieldMap {
        self.build().1
    }

    fn is_strict(&self) -> bool {
        self.strictness.is_strict()
    }

    fn execute<D: Driver>(&self, driver: &D) -> SqlResult<Fetched> {
        let (sql, params) = self.build();
        let (mut statement, ok) = prepare_and_execute(driver, self.kind(), &sql, &params)?;
        if !ok {
            return Err(execution_failed(&statement));
        }
        self.strictness.check_command(&statement, CommandKind::Select)?;

        Ok(self
            .fetch(&mut statement)?
            .unwrap_or_else(|| self.default_value.clone()))
    }
}
