//! `DROP TABLE` rendering.

use crate::error::{ReconcileError, Result};
use crate::schema::TableTarget;

use super::table_head;

pub(super) fn drop_table_sql(target: &TableTarget) -> Result<String> {
    if target.database.is_empty() {
        return Err(ReconcileError::Validation(
            "database name cannot be empty for DROP TABLE".to_string(),
        ));
    }
    if target.name.is_empty() {
        return Err(ReconcileError::Validation(
            "table name cannot be empty for DROP TABLE".to_string(),
        ));
    }

    Ok(format!("DROP TABLE {};", table_head(target)))
}
