//! Table definition types.
//!
//! [`TableSpec`] is what the configuration declares, [`TableState`] is what
//! the catalog reports back for a table that exists. Both serialize to the
//! same JSON shape, the state adding the database-assigned `uuid`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// A single column. Identity for diffing is the name alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Database type expression, passed through verbatim.
    #[serde(rename = "type")]
    pub column_type: String,
    /// Default expression, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Column comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ColumnSpec {
    /// Creates a column with no default and no comment.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            default: None,
            comment: None,
        }
    }

    /// Sets the default expression.
    #[must_use]
    pub fn default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Declared shape of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Cluster to run DDL on (`ON CLUSTER`). Leave unset on single-replica
    /// or managed deployments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    /// Database holding the table.
    pub database_name: String,
    /// Table name.
    pub name: String,
    /// Engine expression, e.g. `MergeTree()`.
    pub engine: String,
    /// Ordered column list.
    pub columns: Vec<ColumnSpec>,
    /// ORDER BY columns.
    #[serde(default)]
    pub order_by: Vec<String>,
    /// PARTITION BY expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_by: Option<String>,
    /// PRIMARY KEY columns. Empty means "use the sorting key".
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// SAMPLE BY expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_by: Option<String>,
    /// TTL expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    /// Table-level settings.
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    /// Table comment.
    #[serde(default)]
    pub comment: String,
    /// Gate for DROP COLUMN and DROP TABLE.
    #[serde(default)]
    pub allow_destructive: bool,
}

impl TableSpec {
    /// Creates a spec with the required fields and everything else empty.
    #[must_use]
    pub fn new(
        database_name: impl Into<String>,
        name: impl Into<String>,
        engine: impl Into<String>,
    ) -> Self {
        Self {
            cluster_name: None,
            database_name: database_name.into(),
            name: name.into(),
            engine: engine.into(),
            columns: Vec::new(),
            order_by: Vec::new(),
            partition_by: None,
            primary_key: Vec::new(),
            sample_by: None,
            ttl: None,
            settings: BTreeMap::new(),
            comment: String::new(),
            allow_destructive: false,
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the ORDER BY columns.
    #[must_use]
    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the PRIMARY KEY columns.
    #[must_use]
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the cluster.
    #[must_use]
    pub fn on_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster_name = Some(cluster.into());
        self
    }

    /// Adds a table setting.
    #[must_use]
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Allows column and table drops.
    #[must_use]
    pub fn allow_destructive(mut self, allow: bool) -> Self {
        self.allow_destructive = allow;
        self
    }

    /// Returns the address used by ALTER and DROP statements.
    #[must_use]
    pub fn target(&self) -> TableTarget {
        TableTarget {
            cluster: self.cluster_name.clone(),
            database: self.database_name.clone(),
            name: self.name.clone(),
        }
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A table as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    /// Database-assigned identity. Stable across renames.
    pub uuid: Uuid,
    /// Observed definition.
    #[serde(flatten)]
    pub table: TableSpec,
}

impl TableState {
    /// Returns the address of the table as currently named.
    #[must_use]
    pub fn target(&self) -> TableTarget {
        self.table.target()
    }
}

/// Where a DDL statement applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTarget {
    /// Cluster for `ON CLUSTER`, if any.
    pub cluster: Option<String>,
    /// Database name.
    pub database: String,
    /// Table name.
    pub name: String,
}

impl TableTarget {
    /// Creates a target without a cluster.
    #[must_use]
    pub fn new(database: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            cluster: None,
            database: database.into(),
            name: name.into(),
        }
    }

    /// Sets the cluster.
    #[must_use]
    pub fn on_cluster(mut self, cluster: Option<String>) -> Self {
        self.cluster = cluster;
        self
    }
}

/// Reads a JSON spec or state document.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_table_spec_builder() {
        let spec = TableSpec::new("db", "events", "MergeTree()")
            .column(ColumnSpec::new("id", "UInt64"))
            .column(ColumnSpec::new("ts", "DateTime").default("now()"))
            .order_by(["id"]);

        assert_eq!(spec.columns.len(), 2);
        assert_eq!(spec.order_by, vec!["id"]);
        assert_eq!(
            spec.get_column("ts").and_then(|c| c.default.as_deref()),
            Some("now()")
        );
        assert!(!spec.allow_destructive);
    }

    #[test]
    fn test_spec_json_defaults() {
        let spec: TableSpec = serde_json::from_str(
            r#"{
                "database_name": "db",
                "name": "t",
                "engine": "MergeTree()",
                "columns": [{"name": "id", "type": "UInt64"}]
            }"#,
        )
        .unwrap();

        assert_eq!(spec.columns[0].column_type, "UInt64");
        assert!(spec.order_by.is_empty());
        assert!(spec.settings.is_empty());
        assert_eq!(spec.comment, "");
        assert!(!spec.allow_destructive);
    }

    #[test]
    fn test_state_flattens_spec() {
        let state = TableState {
            uuid: Uuid::nil(),
            table: TableSpec::new("db", "t", "MergeTree()"),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["uuid"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["database_name"], "db");
        assert!(json.get("table").is_none());
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let doc = serde_json::json!({
            "database_name": "db",
            "name": "t",
            "engine": "Log",
            "columns": [],
            "allow_destructive": true
        });
        write!(file, "{doc}").unwrap();

        let spec: TableSpec = load_json(file.path()).unwrap();
        assert_eq!(spec.engine, "Log");
        assert!(spec.allow_destructive);
    }

    #[test]
    fn test_load_json_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result: Result<TableSpec> = load_json(file.path());
        assert!(matches!(result, Err(crate::error::ReconcileError::Serialization(_))));
    }
}
