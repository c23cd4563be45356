//! The transport seam.
//!
//! Connection pooling, timeouts, retries and cancellation belong to the
//! implementation of [`SqlExecutor`]. Every call made through it from this
//! crate is a single attempt.

use std::collections::HashMap;
use std::future::Future;

/// A result row, column name to string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    values: HashMap<String, String>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column value.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(column.into(), value.into());
        self
    }

    /// Gets a column value.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Runs statements against the database.
pub trait SqlExecutor: Send + Sync {
    /// Transport error.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Executes a statement that returns no rows.
    fn exec(&self, statement: &str) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Executes a query and returns every row.
    fn query(&self, statement: &str) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send;
}
