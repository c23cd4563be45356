//! Table lifecycle against a live database.
//!
//! Each operation sends its statements one at a time through the
//! [`SqlExecutor`] and waits for each before sending the next. Nothing is
//! retried.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::CatalogReader;
use crate::diff::{RecreateReason, diff_columns};
use crate::error::{ReconcileError, Result};
use crate::executor::SqlExecutor;
use crate::import::{ImportId, TableRef};
use crate::normalize::normalize_observed;
use crate::schema::{TableSpec, TableState};
use crate::statement::{build_add_columns, build_create, build_drop, build_drop_columns};

/// Result of an in-place update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The changes were applied; this is the refreshed state.
    Applied(Box<TableState>),
    /// The table has to be destroyed and created again. Nothing was sent.
    RecreateRequired(Vec<RecreateReason>),
}

/// Creates, reads, updates and deletes tables.
pub struct Reconciler<E> {
    executor: E,
}

impl<E: SqlExecutor> Reconciler<E> {
    /// Creates a reconciler.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Returns the executor.
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    fn catalog(&self) -> CatalogReader<'_, E> {
        CatalogReader::new(&self.executor)
    }

    /// Creates the table and reads it back.
    pub async fn create(&self, spec: &TableSpec) -> Result<TableState> {
        let sql = build_create(spec)?;

        info!(
            database = %spec.database_name,
            table = %spec.name,
            "Creating table"
        );
        self.exec(&sql).await?;

        let cluster = spec.cluster_name.as_deref();
        let created = match self
            .catalog()
            .find_table_by_name(&spec.database_name, &spec.name, cluster)
            .await
        {
            Ok(table) => table,
            Err(ReconcileError::NotFound { database, name }) => {
                return Err(ReconcileError::Sync(format!(
                    "table '{database}.{name}' not found after creation"
                )));
            }
            Err(e) => return Err(e),
        };

        info!(uuid = %created.uuid, "Table created");
        Ok(normalize_observed(created, spec))
    }

    /// Reads a table by uuid.
    ///
    /// `None` means the table is gone and should be forgotten. When `desired`
    /// is given, database-side drift is folded back into the declared values.
    pub async fn read(
        &self,
        uuid: Uuid,
        cluster: Option<&str>,
        desired: Option<&TableSpec>,
    ) -> Result<Option<TableState>> {
        let Some(observed) = self.catalog().get_table(uuid, cluster).await? else {
            warn!(%uuid, "Table no longer exists");
            return Ok(None);
        };

        Ok(Some(match desired {
            Some(spec) => normalize_observed(observed, spec),
            None => observed,
        }))
    }

    /// Brings an existing table's columns in line with `desired`.
    ///
    /// Drops are sent before additions. When the diff demands recreation
    /// nothing is sent and the reasons are returned instead.
    pub async fn update(
        &self,
        desired: &TableSpec,
        observed: &TableState,
    ) -> Result<UpdateOutcome> {
        let plan = diff_columns(
            &desired.columns,
            &observed.table.columns,
            &observed.table.order_by,
            desired.allow_destructive,
        )?;

        if plan.must_recreate() {
            warn!(
                database = %observed.table.database_name,
                table = %observed.table.name,
                reason = %plan.recreate_reason().unwrap_or_default(),
                "Table must be recreated"
            );
            return Ok(UpdateOutcome::RecreateRequired(plan.recreate_reasons));
        }

        let target = observed.target();

        if !plan.columns_to_drop.is_empty() {
            info!(
                table = %observed.table.name,
                columns = ?plan.columns_to_drop,
                "Dropping columns"
            );
            self.exec(&build_drop_columns(&target, &plan.columns_to_drop)?)
                .await?;
        }

        if !plan.columns_to_add.is_empty() {
            info!(
                table = %observed.table.name,
                count = plan.columns_to_add.len(),
                "Adding columns"
            );
            self.exec(&build_add_columns(&target, &plan.columns_to_add)?)
                .await?;
        }

        let refreshed = self
            .read(observed.uuid, target.cluster.as_deref(), Some(desired))
            .await?
            .ok_or_else(|| {
                ReconcileError::Sync(format!(
                    "table '{}.{}' disappeared during update",
                    target.database, target.name
                ))
            })?;

        Ok(UpdateOutcome::Applied(Box::new(refreshed)))
    }

    /// Drops the table.
    ///
    /// Refused without sending anything unless `allow_destructive` is set.
    /// A table that is already gone counts as deleted.
    pub async fn delete(&self, state: &TableState) -> Result<()> {
        if !state.table.allow_destructive {
            return Err(ReconcileError::DestructiveChangeDenied {
                object: format!("table '{}.{}'", state.table.database_name, state.table.name),
            });
        }

        let cluster = state.table.cluster_name.as_deref();
        let Some(current) = self.catalog().get_table(state.uuid, cluster).await? else {
            debug!(uuid = %state.uuid, "Table already gone");
            return Ok(());
        };

        // The table may have been renamed since it was last read.
        let mut target = current.target();
        target.cluster = state.table.cluster_name.clone();

        info!(
            database = %target.database,
            table = %target.name,
            "Dropping table"
        );
        self.exec(&build_drop(&target)?).await
    }

    /// Resolves an external `[cluster:]database:table` reference.
    pub async fn import(&self, reference: &str) -> Result<TableState> {
        let id = ImportId::parse(reference)?;
        let cluster = id.cluster.as_deref();

        let catalog = self.catalog();

        let mut state = match &id.table {
            TableRef::Uuid(uuid) => catalog
                .get_table(*uuid, cluster)
                .await?
                .ok_or_else(|| ReconcileError::NotFound {
                    database: id.database.clone(),
                    name: uuid.to_string(),
                })?,
            TableRef::Name(name) => {
                catalog
                    .find_table_by_name(&id.database, name, cluster)
                    .await?
            }
        };

        state.table.cluster_name = id.cluster;
        info!(uuid = %state.uuid, table = %state.table.name, "Imported table");
        Ok(state)
    }

    async fn exec(&self, sql: &str) -> Result<()> {
        debug!(sql = %sql, "Executing statement");
        self.executor
            .exec(sql)
            .await
            .map_err(|e| ReconcileError::execution(sql, e))
    }
}
