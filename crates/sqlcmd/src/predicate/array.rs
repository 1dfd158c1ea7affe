use super::{Compiled, Operator, Predicate, SALT_SEPARATOR, WhereStatement};
use crate::value::FieldMap;

/// Compiles row data into an equality predicate.
///
/// Defaults: conditions within a row are joined with `and`, rows with `or`,
/// and parentheses are on.
///
/// With parentheses every condition renders as `(field = :field_n)`. A single
/// row is the plain join of its conditions; each row of a sequence is wrapped
/// as a whole. Without parentheses nothing is wrapped and operator precedence
/// is left to the database.
///
/// An empty row or an empty sequence compiles to an unusable fragment (`""` or
/// `"()"`); commands do not guard against it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayWhere {
    data: Predicate,
    field_operator: Operator,
    row_operator: Operator,
    use_parenthesis: bool,
}

impl ArrayWhere {
    pub fn new(data: impl Into<Predicate>) -> Self {
        Self {
            data: data.into(),
            field_operator: Operator::And,
            row_operator: Operator::Or,
            use_parenthesis: true,
        }
    }

    /// Operator joining conditions within one row.
    pub fn field_operator(&self) -> Operator {
        self.field_operator
    }

    pub fn set_field_operator(&mut self, op: Operator) -> &mut Self {
        self.field_operator = op;
        self
    }

    pub fn with_field_operator(mut self, op: Operator) -> Self {
        self.field_operator = op;
        self
    }

    /// Operator joining rows.
    pub fn row_operator(&self) -> Operator {
        self.row_operator
    }

    pub fn set_row_operator(&mut self, op: Operator) -> &mut Self {
        self.row_operator = op;
        self
    }

    pub fn with_row_operator(mut self, op: Operator) -> Self {
        self.row_operator = op;
        self
    }

    pub fn use_parenthesis(&self) -> bool {
        self.use_parenthesis
    }

    pub fn set_use_parenthesis(&mut self, enabled: bool) -> &mut Self {
        self.use_parenthesis = enabled;
        self
    }

    pub fn with_parenthesis(mut self, enabled: bool) -> Self {
        self.use_parenthesis = enabled;
        self
    }

    /// The uncompiled predicate data.
    pub fn where_data(&self) -> &Predicate {
        &self.data
    }

    pub fn set_where_data(&mut self, data: impl Into<Predicate>) -> &mut Self {
        self.data = data.into();
        self
    }

    fn wrap(&self, sql: String) -> String {
        if self.use_parenthesis {
            format!("({sql})")
        } else {
            sql
        }
    }

    /// Compile one row, consuming the next salt value.
    fn compile_row(&self, row: &FieldMap, salt: &mut usize, params: &mut FieldMap) -> String {
        let current = *salt;
        *salt += 1;

        let conditions: Vec<String> = row
            .iter()
            .map(|(field, value)| {
                let placeholder = format!("{field}{SALT_SEPARATOR}{current}");
                let condition = self.wrap(format!("{field} = :{placeholder}"));
                params.insert(placeholder, value.clone());
                condition
            })
            .collect();

        conditions.join(&format!(" {} ", self.field_operator))
    }
}

impl WhereStatement for ArrayWhere {
    fn compile(&self) -> Compiled {
        let mut params = FieldMap::new();
        let mut salt = 1;

        let sql = match &self.data {
            Predicate::Row(row) => self.compile_row(row, &mut salt, &mut params),
            Predicate::Rows(rows) => {
                let parts: Vec<String> = rows
                    .iter()
                    .map(|row| {
                        let sql = self.compile_row(row, &mut salt, &mut params);
                        self.wrap(sql)
                    })
                    .collect();
                parts.join(&format!(" {} ", self.row_operator))
            }
        };

        Compiled { sql, params }
    }
}
