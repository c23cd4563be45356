//! Reads observed table state from the `system` catalog.
//!
//! A table is looked up by uuid in `system.tables`, its columns in
//! `system.columns`. Free-text fields (`sorting_key`, `engine_full`, ...) are
//! turned back into structured values by [`parse_key_columns`] and
//! [`engine_full::parse`].

pub mod engine_full;
mod keys;
pub(crate) mod text;

pub use keys::parse_key_columns;

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::error::{ReconcileError, Result};
use crate::executor::{Row, SqlExecutor};
use crate::schema::{ColumnSpec, TableSpec, TableState};
use crate::statement::SelectQuery;

const TABLE_FIELDS: &[&str] = &[
    "database",
    "name",
    "engine",
    "partition_key",
    "sorting_key",
    "primary_key",
    "sampling_key",
    "engine_full",
    "comment",
];

const COLUMN_FIELDS: &[&str] = &["name", "type", "default_expression", "comment"];

/// Catalog lookups over a borrowed executor.
pub struct CatalogReader<'e, E> {
    executor: &'e E,
}

impl<'e, E: SqlExecutor> CatalogReader<'e, E> {
    /// Creates a reader.
    pub fn new(executor: &'e E) -> Self {
        Self { executor }
    }

    /// Reads a table by uuid. `None` means the table no longer exists.
    pub async fn get_table(&self, uuid: Uuid, cluster: Option<&str>) -> Result<Option<TableState>> {
        let uuid_text = uuid.to_string();
        let sql = SelectQuery {
            columns: TABLE_FIELDS,
            system_table: "tables",
            filters: &[("uuid", uuid_text.as_str())],
            cluster,
        }
        .build();

        let Some(row) = self.query(&sql).await?.into_iter().next() else {
            debug!(%uuid, "Table not found in catalog");
            return Ok(None);
        };

        let mut table = table_from_row(&row)?;
        table.cluster_name = cluster.map(str::to_string);
        table.columns = self
            .get_columns(&table.database_name, &table.name, cluster)
            .await?;

        Ok(Some(TableState { uuid, table }))
    }

    /// Resolves a table's uuid from its name.
    pub async fn find_uuid(
        &self,
        database: &str,
        name: &str,
        cluster: Option<&str>,
    ) -> Result<Option<Uuid>> {
        let sql = SelectQuery {
            columns: &["uuid"],
            system_table: "tables",
            filters: &[("database", database), ("name", name)],
            cluster,
        }
        .build();

        self.query(&sql)
            .await?
            .first()
            .map(|row| {
                let value = field(row, "uuid")?;
                Uuid::parse_str(value).map_err(|e| ReconcileError::MalformedRow {
                    field: format!("uuid '{value}': {e}"),
                })
            })
            .transpose()
    }

    /// Reads a table by name. Unlike [`Self::get_table`], absence is an error.
    pub async fn find_table_by_name(
        &self,
        database: &str,
        name: &str,
        cluster: Option<&str>,
    ) -> Result<TableState> {
        let not_found = || ReconcileError::NotFound {
            database: database.to_string(),
            name: name.to_string(),
        };

        let uuid = self
            .find_uuid(database, name, cluster)
            .await?
            .ok_or_else(not_found)?;

        self.get_table(uuid, cluster).await?.ok_or_else(not_found)
    }

    async fn get_columns(
        &self,
        database: &str,
        table: &str,
        cluster: Option<&str>,
    ) -> Result<Vec<ColumnSpec>> {
        let sql = SelectQuery {
            columns: COLUMN_FIELDS,
            system_table: "columns",
            filters: &[("database", database), ("table", table)],
            cluster,
        }
        .build();

        columns_from_rows(&self.query(&sql).await?)
    }

    async fn query(&self, sql: &str) -> Result<Vec<Row>> {
        debug!(sql = %sql, "Querying catalog");
        self.executor
            .query(sql)
            .await
            .map_err(|e| ReconcileError::execution(sql, e))
    }
}

fn field<'r>(row: &'r Row, name: &str) -> Result<&'r str> {
    row.get(name).ok_or_else(|| ReconcileError::MalformedRow {
        field: format!("missing '{name}'"),
    })
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn table_from_row(row: &Row) -> Result<TableSpec> {
    let clauses = engine_full::parse(field(row, "engine_full")?);

    Ok(TableSpec {
        cluster_name: None,
        database_name: field(row, "database")?.to_string(),
        name: field(row, "name")?.to_string(),
        engine: field(row, "engine")?.to_string(),
        columns: Vec::new(),
        order_by: parse_key_columns(field(row, "sorting_key")?),
        partition_by: optional(field(row, "partition_key")?),
        primary_key: parse_key_columns(field(row, "primary_key")?),
        sample_by: optional(field(row, "sampling_key")?),
        ttl: clauses.ttl,
        settings: clauses.settings,
        comment: field(row, "comment")?.to_string(),
        allow_destructive: false,
    })
}

/// Converts column rows, keeping the first row per name.
///
/// Cluster-wide reads return every column once per replica.
fn columns_from_rows(rows: &[Row]) -> Result<Vec<ColumnSpec>> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for row in rows {
        let column = column_from_row(row)?;
        if seen.insert(column.name.clone()) {
            columns.push(column);
        }
    }
    Ok(columns)
}

fn column_from_row(row: &Row) -> Result<ColumnSpec> {
    Ok(ColumnSpec {
        name: field(row, "name")?.to_string(),
        column_type: field(row, "type")?.to_string(),
        default: optional(field(row, "default_expression")?),
        comment: optional(field(row, "comment")?),
    })
}
