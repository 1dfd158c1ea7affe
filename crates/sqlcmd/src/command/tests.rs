use super::*;
use crate::driver::FetchStyle;
use crate::error::{DriverError, ErrorKind};
use crate::fields;
use crate::predicate::{ArrayWhere, RawWhere};
use crate::value::{Row, Value};
use std::cell::{Cell, RefCell};

// ── Recording mock driver ──

#[derive(Clone)]
enum Outcome {
    Returns(bool),
    Fails(&'static str),
}

struct MockDriver {
    outcome: Outcome,
    affected: u64,
    one: Option<Row>,
    all: Vec<Row>,
    prepared: RefCell<Vec<String>>,
    executed: RefCell<Vec<Option<FieldMap>>>,
    fetch_one_calls: Cell<usize>,
    fetch_all_calls: Cell<usize>,
    last_id_calls: Cell<usize>,
}

impl MockDriver {
    fn new() -> Self {
        Self {
            outcome: Outcome::Returns(true),
            affected: 1,
            one: None,
            all: Vec::new(),
            prepared: RefCell::new(Vec::new()),
            executed: RefCell::new(Vec::new()),
            fetch_one_calls: Cell::new(0),
            fetch_all_calls: Cell::new(0),
            last_id_calls: Cell::new(0),
        }
    }

    fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }

    fn affected(mut self, affected: u64) -> Self {
        self.affected = affected;
        self
    }

    fn one(mut self, row: Row) -> Self {
        self.one = Some(row);
        self
    }

    fn all(mut self, rows: Vec<Row>) -> Self {
        self.all = rows;
        self
    }

    fn prepared(&self) -> Vec<String> {
        self.prepared.borrow().clone()
    }

    fn executed(&self) -> Vec<Option<FieldMap>> {
        self.executed.borrow().clone()
    }
}

struct MockStatement<'a> {
    driver: &'a MockDriver,
}

impl Driver for MockDriver {
    type Statement<'a> = MockStatement<'a>;

    fn prepare(&self, sql: &str) -> Result<MockStatement<'_>, DriverError> {
        self.prepared.borrow_mut().push(sql.to_string());
        Ok(MockStatement { driver: self })
    }

    fn last_insert_id(&self) -> Result<Value, DriverError> {
        self.last_id_calls.set(self.last_id_calls.get() + 1);
        Ok(Value::Int(1447))
    }
}

impl Statement for MockStatement<'_> {
    fn execute(&mut self, params: Option<&FieldMap>) -> Result<bool, DriverError> {
        self.driver.executed.borrow_mut().push(params.cloned());
        match self.driver.outcome {
            Outcome::Returns(ok) => Ok(ok),
            Outcome::Fails(message) => Err(DriverError::new(message)),
        }
    }

    fn affected_rows(&self) -> u64 {
        self.driver.affected
    }

    fn fetch_one(&mut self, _: FetchStyle) -> Result<Option<Row>, DriverError> {
        let calls = &self.driver.fetch_one_calls;
        calls.set(calls.get() + 1);
        Ok(self.driver.one.clone())
    }

    fn fetch_all(&mut self, _: FetchStyle) -> Result<Vec<Row>, DriverError> {
        let calls = &self.driver.fetch_all_calls;
        calls.set(calls.get() + 1);
        Ok(self.driver.all.clone())
    }

    fn error_info(&self) -> Option<String> {
        Some("mock failure".to_string())
    }
}

fn id_where() -> RawWhere {
    RawWhere::new("id = 1").with_params(fields! { "id" => 1 })
}

fn bob() -> Row {
    fields! { "id" => 1, "name" => "Bob" }
}

// ── Create ──

#[test]
fn test_create_table_and_data() {
    let mut cmd = Create::new("someTable", FieldMap::new());
    assert_eq!(cmd.table(), "someTable");
    assert!(cmd.data().unwrap().is_empty());

    cmd.set_table("someOtherTable").set_data(fields! { "test" => "test" });
    assert_eq!(cmd.table(), "someOtherTable");
    assert_eq!(cmd.data().unwrap(), &fields! { "test" => "test" });
}

#[test]
fn test_create_sql_empty_data() {
    let cmd = Create::new("someTable", FieldMap::new());
    assert!(matches!(cmd.sql(), Err(SqlError::EmptyDataset)));
}

#[test]
fn test_create_sql_single_field() {
    let cmd = Create::new("someTable", fields! { "data" => "notUsedHere" });
    assert_eq!(cmd.sql().unwrap(), "INSERT INTO someTable (data) VALUES (:data)");
}

#[test]
fn test_create_sql_more_fields() {
    let cmd = Create::new(
        "someTable",
        fields! { "id" => "name", "name" => "someName", "data" => "notUsedHere" },
    );
    assert_eq!(
        cmd.sql().unwrap(),
        "INSERT INTO someTable (id, name, data) VALUES (:id, :name, :data)"
    );
}

#[test]
fn test_create_execute_returns_generated_id() {
    let driver = MockDriver::new();
    let cmd = create("someTable", fields! { "data" => 1 });

    assert_eq!(cmd.execute(&driver).unwrap(), Value::Int(1447));
    assert_eq!(driver.prepared(), vec![cmd.sql().unwrap()]);
    assert_eq!(driver.executed(), vec![Some(fields! { "data" => 1 })]);
    assert_eq!(driver.last_id_calls.get(), 1);
}

#[test]
fn test_create_empty_data_never_reaches_driver() {
    let driver = MockDriver::new();
    let err = create("someTable", FieldMap::new())
        .execute(&driver)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyDataset);
    assert!(driver.prepared().is_empty());
}

#[test]
fn test_create_strict_no_records() {
    let driver = MockDriver::new().affected(0);
    let err = create("someTable", fields! { "data" => 1 })
        .strict(true)
        .execute(&driver)
        .unwrap_err();
    assert_eq!(err.affected_command(), Some(CommandKind::Create));
    assert_eq!(driver.last_id_calls.get(), 0);
}

#[test]
fn test_create_not_strict_no_records() {
    let driver = MockDriver::new().affected(0);
    let id = create("someTable", fields! { "data" => 1 })
        .execute(&driver)
        .unwrap();
    assert_eq!(id, Value::Int(1447));
}

#[test]
fn test_create_execute_returns_false() {
    let driver = MockDriver::new().outcome(Outcome::Returns(false));
    let err = create("someTable", fields! { "data" => 1 })
        .execute(&driver)
        .unwrap_err();
    assert!(matches!(err, SqlError::Execution(ref m) if m == "mock failure"));
}

#[test]
fn test_create_driver_error_is_wrapped() {
    let driver = MockDriver::new().outcome(Outcome::Fails("test"));
    let err = create("someTable", fields! { "data" => 1 })
        .execute(&driver)
        .unwrap_err();
    assert!(matches!(err, SqlError::Execution(ref m) if m == "test"));
}

// ── Select ──

#[test]
fn test_select_defaults() {
    let cmd = Select::new("someTable");
    assert_eq!(cmd.fields(), ["*"]);
    assert_eq!(cmd.fetch_config(), FetchConfig::default());
    assert_eq!(cmd.fetch_config().style, FetchStyle::Assoc);
    assert_eq!(cmd.fetch_config().mode, FetchMode::Full);
    assert_eq!(cmd.default_value(), &Fetched::Rows(Vec::new()));
    assert!(!cmd.is_strict());
    assert_eq!(cmd.sql().unwrap(), "SELECT * FROM someTable");
}

#[test]
fn test_select_fields() {
    let mut cmd = Select::new("someTable");
    cmd.set_fields(["id", "name"]);
    assert_eq!(cmd.fields(), ["id", "name"]);
    assert_eq!(cmd.sql().unwrap(), "SELECT id, name FROM someTable");

    cmd.set_fields(Vec::<String>::new());
    assert_eq!(cmd.fields(), ["*"]);
}

#[test]
fn test_select_table() {
    let mut cmd = Select::new("someTable");
    cmd.set_table("someOtherTest");
    assert_eq!(cmd.table(), "someOtherTest");
}

#[test]
fn test_select_sql_with_where() {
    let cmd = select("users").with_where(ArrayWhere::new(fields! { "id" => 1 }));
    assert_eq!(cmd.sql().unwrap(), "SELECT * FROM users WHERE (id = :id_1)");
    assert_eq!(cmd.params(), fields! { "id_1" => 1 });
}

#[test]
fn test_select_data_not_applicable() {
    let err = Select::new("someTable").data().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MethodNotApplicable);
}

#[test]
fn test_select_flat_with_where_default_data() {
    let driver = MockDriver::new();
    let mut cmd = Select::new("someTable");
    cmd.set_fetch_flat(true).set_where(id_where());

    assert_eq!(cmd.execute(&driver).unwrap(), Fetched::Rows(Vec::new()));
    assert_eq!(driver.prepared(), vec!["SELECT * FROM someTable WHERE id = 1"]);
    assert_eq!(driver.executed(), vec![Some(fields! { "id" => 1 })]);
    assert_eq!(driver.fetch_one_calls.get(), 1);
    assert_eq!(driver.fetch_all_calls.get(), 0);
}

#[test]
fn test_select_flat_no_where_default_data() {
    let driver = MockDriver::new();
    let mut cmd = Select::new("someTable");
    cmd.set_fetch_flat(true);

    assert_eq!(cmd.execute(&driver).unwrap(), Fetched::default());
    assert_eq!(driver.executed(), vec![None]);
}

#[test]
fn test_select_flat_empty_row_is_default() {
    let driver = MockDriver::new().one(Row::new());
    let cmd = Select::new("someTable").with_fetch_config(FetchConfig::new().flat());
    assert_eq!(cmd.execute(&driver).unwrap(), Fetched::default());
}

#[test]
fn test_select_flat_with_where_with_data() {
    let driver = MockDriver::new().one(bob());
    let cmd = Select::new("someTable")
        .with_fetch_config(FetchConfig::new().flat())
        .with_where(id_where());
    assert_eq!(cmd.execute(&driver).unwrap(), Fetched::Row(bob()));
}

#[test]
fn test_select_flat_no_where_with_data() {
    let driver = MockDriver::new().one(bob());
    let cmd = Select::new("someTable").with_fetch_config(FetchConfig::new().flat());
    assert_eq!(cmd.execute(&driver).unwrap(), Fetched::Row(bob()));
    assert_eq!(driver.executed(), vec![None]);
}

#[test]
fn test_select_full_with_where_default_data() {
    let driver = MockDriver::new();
    let cmd = Select::new("someTable").with_where(id_where());
    assert_eq!(cmd.execute(&driver).unwrap(), Fetched::Rows(Vec::new()));
    assert_eq!(driver.fetch_one_calls.get(), 0);
    assert_eq!(driver.fetch_all_calls.get(), 1);
}

#[test]
fn test_select_full_with_data() {
    let driver = MockDriver::new().all(vec![bob(), fields! { "id" => 2, "name" => "Ann" }]);
    let fetched = Select::new("someTable").execute(&driver).unwrap();
    let rows = fetched.into_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["name"], Value::from("Ann"));
}

#[test]
fn test_select_custom_default_value() {
    let fallback = Fetched::Row(fields! { "id" => 0 });
    let driver = MockDriver::new();
    let cmd = Select::new("someTable").with_default_value(fallback.clone());
    assert_eq!(cmd.execute(&driver).unwrap(), fallback);
}

#[test]
fn test_select_strict_no_records() {
    let driver = MockDriver::new().affected(0);
    let err = Select::new("someTable")
        .strict(true)
        .execute(&driver)
        .unwrap_err();
    assert_eq!(err.affected_command(), Some(CommandKind::Select));
    assert_eq!(driver.fetch_all_calls.get(), 0);
}

#[test]
fn test_select_not_strict_no_records() {
    let driver = MockDriver::new().affected(0);
    let cmd = Select::new("someTable").with_where(id_where());
    assert_eq!(cmd.execute(&driver).unwrap(), Fetched::default());
    assert_eq!(driver.fetch_all_calls.get(), 1);
}

#[test]
fn test_select_driver_error_is_wrapped() {
    let driver = MockDriver::new().outcome(Outcome::Fails("boom"));
    let err = Select::new("someTable").execute(&driver).unwrap_err();
    assert!(matches!(err, SqlError::Execution(ref m) if m == "boom"));
}

// ── Update ──

fn update_cmd() -> Update {
    Update::new("someTable", fields! { "id" => 100 })
}

#[test]
fn test_update_table_and_data() {
    let mut cmd = update_cmd();
    assert_eq!(cmd.table(), "someTable");
    assert_eq!(cmd.data().unwrap(), &fields! { "id" => 100 });

    cmd.set_table("someOtherTable")
        .set_data(fields! { "id" => 100, "name" => "bob" });
    assert_eq!(cmd.table(), "someOtherTable");
    assert_eq!(cmd.data().unwrap().len(), 2);
}

#[test]
fn test_update_sql() {
    assert_eq!(update_cmd().sql().unwrap(), "UPDATE someTable SET id = :id");

    let cmd = Update::new("someTable", fields! { "id" => 100, "name" => "bob" });
    assert_eq!(cmd.sql().unwrap(), "UPDATE someTable SET id = :id, name = :name");
}

#[test]
fn test_update_sql_no_data() {
    let mut cmd = update_cmd();
    cmd.set_data(FieldMap::new());
    assert!(cmd.sql().unwrap_err().is_empty_dataset());

    cmd.set_where(id_where());
    assert!(cmd.sql().unwrap_err().is_empty_dataset());
}

#[test]
fn test_update_sql_where() {
    let cmd = update_cmd().with_where(RawWhere::new("1 = 1"));
    assert_eq!(cmd.sql().unwrap(), "UPDATE someTable SET id = :id WHERE 1 = 1");
}

#[test]
fn test_update_combined_data() {
    let mut cmd = update_cmd();
    cmd.set_where(RawWhere::new("1 = 1").with_params(fields! { "field" => "where", "where" => 1 }))
        .set_data(fields! { "field" => "sql", "sql" => 1 });

    let combined = cmd.combined_data();
    assert_eq!(combined, fields! { "field" => "where", "sql" => 1, "where" => 1 });
    let keys: Vec<&str> = combined.keys().map(String::as_str).collect();
    assert_eq!(keys, ["field", "sql", "where"]);
    assert_eq!(cmd.params(), combined);
}

#[test]
fn test_update_execute() {
    let driver = MockDriver::new();
    let mut cmd = update_cmd();
    cmd.set_where(RawWhere::new("1 = 1").with_params(fields! { "field" => "where", "where" => 1 }))
        .set_data(fields! { "data" => 1 });

    assert!(cmd.execute(&driver).unwrap());
    assert_eq!(driver.prepared(), vec!["UPDATE someTable SET data = :data WHERE 1 = 1"]);
    assert_eq!(driver.executed(), vec![Some(cmd.combined_data())]);
}

#[test]
fn test_update_execute_with_array_where() {
    let driver = MockDriver::new();
    let cmd = update("users", fields! { "active" => false })
        .with_where(ArrayWhere::new(vec![fields! { "id" => 1 }, fields! { "id" => 2 }]));

    assert!(cmd.execute(&driver).unwrap());
    assert_eq!(
        driver.prepared(),
        vec!["UPDATE users SET active = :active WHERE ((id = :id_1)) or ((id = :id_2))"]
    );
    assert_eq!(
        driver.executed(),
        vec![Some(fields! { "active" => false, "id_1" => 1, "id_2" => 2 })]
    );
}

#[test]
fn test_update_execute_fail() {
    let driver = MockDriver::new().outcome(Outcome::Fails("test"));
    let cmd = update_cmd().with_where(RawWhere::new("1 = 1"));
    let err = cmd.execute(&driver).unwrap_err();
    assert!(matches!(err, SqlError::Execution(ref m) if m == "test"));
}

#[test]
fn test_update_execute_empty_dataset() {
    let driver = MockDriver::new();
    let cmd = Update::new("someTable", FieldMap::new()).with_where(id_where());
    let err = cmd.execute(&driver).unwrap_err();
    assert!(err.is_empty_dataset());
    assert!(driver.prepared().is_empty());
}

#[test]
fn test_update_strict() {
    let driver = MockDriver::new().affected(0);
    let err = update_cmd().strict(true).execute(&driver).unwrap_err();
    assert_eq!(err.affected_command(), Some(CommandKind::Update));

    let driver = MockDriver::new().affected(0);
    assert!(update_cmd().execute(&driver).unwrap());
}

// ── Delete ──

#[test]
fn test_delete_table() {
    let mut cmd = Delete::new("someTable");
    assert_eq!(cmd.table(), "someTable");
    cmd.set_table("someOtherTable");
    assert_eq!(cmd.table(), "someOtherTable");
}

#[test]
fn test_delete_data_not_applicable() {
    let err = Delete::new("someTable").data().unwrap_err();
    assert!(matches!(
        err,
        SqlError::MethodNotApplicable {
            command: CommandKind::Delete,
            method: "data"
        }
    ));
}

#[test]
fn test_delete_params_with_where() {
    let cmd = Delete::new("someTable").with_where(
        RawWhere::new("1 = 1").with_params(fields! { "field" => "where", "where" => 1 }),
    );
    assert_eq!(cmd.params(), fields! { "field" => "where", "where" => 1 });
    assert!(Delete::new("someTable").params().is_empty());
}

#[test]
fn test_delete_sql() {
    assert_eq!(Delete::new("someTable").sql().unwrap(), "DELETE FROM someTable");
}

#[test]
fn test_delete_sql_with_where() {
    let cmd = Delete::new("someTable").with_where(RawWhere::new("1 = 1"));
    assert_eq!(cmd.sql().unwrap(), "DELETE FROM someTable WHERE 1 = 1");
}

#[test]
fn test_delete_execute_with_where() {
    let driver = MockDriver::new();
    let cmd = Delete::new("someTable").with_where(
        RawWhere::new("1 = 1").with_params(fields! { "field" => "where", "where" => 1 }),
    );
    assert!(cmd.execute(&driver).unwrap());
    assert_eq!(driver.prepared(), vec!["DELETE FROM someTable WHERE 1 = 1"]);
    assert_eq!(driver.executed(), vec![Some(fields! { "field" => "where", "where" => 1 })]);
}

#[test]
fn test_delete_execute_no_where() {
    let driver = MockDriver::new();
    assert!(delete("someTable").execute(&driver).unwrap());
    assert_eq!(driver.prepared(), vec!["DELETE FROM someTable"]);
    assert_eq!(driver.executed(), vec![None]);
}

#[test]
fn test_delete_execute_fail() {
    let driver = MockDriver::new().outcome(Outcome::Fails("test"));
    let err = delete("someTable").execute(&driver).unwrap_err();
    assert!(matches!(err, SqlError::Execution(ref m) if m == "test"));
}

#[test]
fn test_delete_returns_false_without_error() {
    let driver = MockDriver::new().outcome(Outcome::Returns(false)).affected(0);
    assert!(!delete("someTable").strict(true).execute(&driver).unwrap());
}

#[test]
fn test_delete_strict() {
    let driver = MockDriver::new().affected(0);
    let err = delete("someTable")
        .strict(true)
        .execute(&driver)
        .unwrap_err();
    assert_eq!(err.affected_command(), Some(CommandKind::Delete));
    assert_eq!(err.to_string(), "No records affected by delete");
}

#[test]
fn test_delete_not_strict_no_records() {
    let driver = MockDriver::new().affected(0);
    assert!(delete("someTable").execute(&driver).unwrap());
    assert_eq!(driver.executed(), vec![None]);
}

// ── Facade ──

#[test]
fn test_facade_kinds() {
    assert_eq!(create("t", FieldMap::new()).kind(), CommandKind::Create);
    assert_eq!(select("t").kind(), CommandKind::Select);
    assert_eq!(update("t", FieldMap::new()).kind(), CommandKind::Update);
    assert_eq!(delete("t").kind(), CommandKind::Delete);
}

#[test]
fn test_sql_is_idempotent() {
    let cmd = select("users").with_where(ArrayWhere::new(vec![
        fields! { "id" => 1 },
        fields! { "id" => 2 },
    ]));
    assert_eq!(cmd.sql().unwrap(), cmd.sql().unwrap());
    assert_eq!(cmd.params(), cmd.params());
}
