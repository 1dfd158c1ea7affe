use super::{Compiled, WhereStatement};
use std::fmt;

/// Optional WHERE component shared by Select, Update and Delete.
#[derive(Default)]
pub struct Filter {
    inner: Option<Box<dyn WhereStatement>>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, where_: impl WhereStatement + 'static) {
        self.inner = Some(Box::new(where_));
    }

    pub fn set_boxed(&mut self, where_: Option<Box<dyn WhereStatement>>) {
        self.inner = where_;
    }

    pub fn clear(&mut self) {
        self.inner = None;
    }

    pub fn is_set(&self) -> bool {
        self.inner.is_some()
    }

    pub fn get(&self) -> Option<&dyn WhereStatement> {
        self.inner.as_deref()
    }

    /// Compile the predicate, if any.
    pub fn compile(&self) -> Option<Compiled> {
        self.inner.as_ref().map(|w| w.compile())
    }

    /// Append ` WHERE <fragment>` to `sql` and return the bound parameters.
    ///
    /// Leaves `sql` untouched and returns an empty map when no predicate is set.
    pub(crate) fn render_into(&self, sql: &mut String) -> crate::value::FieldMap {
        match self.compile() {
            Some(compiled) => {
                sql.push_str(" WHERE ");
                sql.push_str(&compiled.sql);
                let trimmed = sql.trim_end().len();
                sql.truncate(trimmed);
                compiled.params
            }
            None => crate::value::FieldMap::new(),
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.compile() {
            Some(compiled) => f.debug_tuple("Filter").field(&compiled.sql).finish(),
            None => f.write_str("Filter(None)"),
        }
    }
}
