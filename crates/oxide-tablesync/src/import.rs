//! Parsing of external table references.
//!
//! A reference has the form `[cluster:]database:table`, where `table` is
//! either a uuid or a table name.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::ReconcileError;

/// How the table part of a reference identifies the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    /// The database-assigned uuid.
    Uuid(Uuid),
    /// The table name, resolved through the catalog.
    Name(String),
}

/// A parsed `[cluster:]database:table` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    /// Cluster, when the reference has three parts.
    pub cluster: Option<String>,
    /// Database name.
    pub database: String,
    /// Table uuid or name.
    pub table: TableRef,
}

impl ImportId {
    /// Parses a reference. The table part is tried as a uuid first.
    pub fn parse(reference: &str) -> Result<Self, ReconcileError> {
        let parts: Vec<&str> = reference.split(':').collect();
        let (cluster, database, table) = match parts.as_slice() {
            [database, table] => (None, *database, *table),
            [cluster, database, table] => (Some(*cluster), *database, *table),
            _ => return Err(invalid(reference)),
        };

        if cluster.is_some_and(str::is_empty) || database.is_empty() || table.is_empty() {
            return Err(invalid(reference));
        }

        let table = match Uuid::parse_str(table) {
            Ok(uuid) => TableRef::Uuid(uuid),
            Err(_) => TableRef::Name(table.to_string()),
        };

        Ok(Self {
            cluster: cluster.map(str::to_string),
            database: database.to_string(),
            table,
        })
    }
}

impl FromStr for ImportId {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cluster) = &self.cluster {
            write!(f, "{cluster}:")?;
        }
        match &self.table {
            TableRef::Uuid(uuid) => write!(f, "{}:{uuid}", self.database),
            TableRef::Name(name) => write!(f, "{}:{name}", self.database),
        }
    }
}

fn invalid(reference: &str) -> ReconcileError {
    ReconcileError::Validation(format!(
        "invalid table reference '{reference}': expected 'database:table', \
         'cluster:database:table' or 'database:uuid'"
    ))
}
