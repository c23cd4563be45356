#![allow(dead_code)]

use std::sync::Mutex;

use oxide_tablesync::executor::{Row, SqlExecutor};

pub const UUID: &str = "1f6c0e4a-3b1d-4c49-9d2e-0d7a4f8b9e21";

#[derive(Debug, thiserror::Error)]
#[error("mock transport failure: {0}")]
pub struct MockError(pub String);

/// Records every statement and answers catalog queries from canned rows.
///
/// A query gets the rows of the first response whose pattern it contains,
/// or no rows at all.
#[derive(Default)]
pub struct MockExecutor {
    statements: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    responses: Mutex<Vec<(String, Vec<Row>)>>,
    fail_exec: bool,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_exec: true,
            ..Self::default()
        }
    }

    pub fn respond(self, pattern: &str, rows: Vec<Row>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push((pattern.to_string(), rows));
        self
    }

    /// Answers both name and uuid lookups for one table.
    pub fn with_table(self, table: Row, columns: Vec<Row>) -> Self {
        self.respond("SELECT `uuid` FROM", vec![Row::new().with("uuid", UUID)])
            .respond("WHERE `uuid` =", vec![table])
            .respond("`system`.`columns`", columns)
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl SqlExecutor for MockExecutor {
    type Error = MockError;

    async fn exec(&self, statement: &str) -> Result<(), MockError> {
        self.statements.lock().unwrap().push(statement.to_string());
        if self.fail_exec {
            return Err(MockError("connection reset".to_string()));
        }
        Ok(())
    }

    async fn query(&self, statement: &str) -> Result<Vec<Row>, MockError> {
        self.queries.lock().unwrap().push(statement.to_string());
        let responses = self.responses.lock().unwrap();
        Ok(responses
            .iter()
            .find(|(pattern, _)| statement.contains(pattern.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default())
    }
}

pub fn table_row(database: &str, name: &str, engine: &str, sorting_key: &str) -> Row {
    Row::new()
        .with("database", database)
        .with("name", name)
        .with("engine", engine)
        .with("partition_key", "")
        .with("sorting_key", sorting_key)
        .with("primary_key", sorting_key)
        .with("sampling_key", "")
        .with(
            "engine_full",
            format!("{engine} ORDER BY {sorting_key} SETTINGS index_granularity = 8192"),
        )
        .with("comment", "")
}

pub fn column_row(name: &str, column_type: &str) -> Row {
    Row::new()
        .with("name", name)
        .with("type", column_type)
        .with("default_expression", "")
        .with("comment", "")
}
