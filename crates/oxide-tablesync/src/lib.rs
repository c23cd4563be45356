//! Declarative ClickHouse table reconciliation.
//!
//! `oxide-tablesync` compares a declared table definition with what the
//! database catalog reports and closes the gap:
//! - New columns are added in place
//! - Removed columns are dropped in place, only when `allow_destructive` is set
//! - Type changes and removal of ORDER BY columns are reported as requiring
//!   recreation, never applied silently
//! - Rewrites done by the database itself (shared engine variants, inferred
//!   primary keys, default settings, TTL formatting) do not show up as drift
//!
//! # Architecture
//!
//! - **Statement** - Renders escaped `CREATE`, `ALTER`, `DROP` and catalog `SELECT` statements
//! - **Catalog** - Reads `system.tables`/`system.columns` into a [`schema::TableState`]
//! - **Diff** - Computes a [`diff::ChangePlan`] from desired and observed columns
//! - **Normalize** - Folds database-side transformations back into declared values
//! - **Reconciler** - Create/read/update/delete over a [`executor::SqlExecutor`]
//!
//! # Example
//!
//! ```rust,ignore
//! use oxide_tablesync::prelude::*;
//!
//! let spec = TableSpec::new("analytics", "events", "MergeTree()")
//!     .column(ColumnSpec::new("id", "UInt64"))
//!     .column(ColumnSpec::new("ts", "DateTime"))
//!     .order_by(["id"]);
//!
//! let reconciler = Reconciler::new(my_executor);
//! let state = reconciler.create(&spec).await?;
//!
//! match reconciler.update(&spec, &state).await? {
//!     UpdateOutcome::Applied(state) => println!("in sync: {}", state.uuid),
//!     UpdateOutcome::RecreateRequired(reasons) => println!("replace: {reasons:?}"),
//! }
//! ```

pub mod catalog;
pub mod diff;
pub mod error;
pub mod executor;
pub mod import;
pub mod normalize;
pub mod reconciler;
pub mod schema;
pub mod statement;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::CatalogReader;
    pub use crate::diff::{ChangePlan, RecreateReason, diff_columns};
    pub use crate::error::{ReconcileError, Result};
    pub use crate::executor::{Row, SqlExecutor};
    pub use crate::import::{ImportId, TableRef};
    pub use crate::normalize::{engines_equivalent, normalize_observed};
    pub use crate::reconciler::{Reconciler, UpdateOutcome};
    pub use crate::schema::{ColumnSpec, TableSpec, TableState, TableTarget};
    pub use crate::statement::{
        DdlStatement, build_add_columns, build_create, build_drop, build_drop_columns,
    };
}
