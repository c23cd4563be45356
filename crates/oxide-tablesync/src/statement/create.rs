//! `CREATE TABLE` rendering.

use crate::error::{ReconcileError, Result};
use crate::schema::TableSpec;

use super::{
    check_column_comments, check_comment, column_definition, non_empty, quoted_list, table_head,
};

pub(super) fn create_table_sql(spec: &TableSpec) -> Result<String> {
    validate(spec)?;

    let mut sql = String::from("CREATE TABLE ");
    sql.push_str(&table_head(&spec.target()));

    let column_defs: Vec<String> = spec.columns.iter().map(column_definition).collect();
    sql.push_str(" (");
    sql.push_str(&column_defs.join(", "));
    sql.push(')');

    sql.push_str(" ENGINE = ");
    sql.push_str(&spec.engine);

    if !spec.order_by.is_empty() {
        sql.push_str(" ORDER BY (");
        sql.push_str(&quoted_list(&spec.order_by));
        sql.push(')');
    }

    if let Some(partition_by) = non_empty(spec.partition_by.as_deref()) {
        sql.push_str(" PARTITION BY ");
        sql.push_str(partition_by);
    }

    if !spec.primary_key.is_empty() {
        sql.push_str(" PRIMARY KEY (");
        sql.push_str(&quoted_list(&spec.primary_key));
        sql.push(')');
    }

    if let Some(sample_by) = non_empty(spec.sample_by.as_deref()) {
        sql.push_str(" SAMPLE BY ");
        sql.push_str(sample_by);
    }

    if let Some(ttl) = non_empty(spec.ttl.as_deref()) {
        sql.push_str(" TTL ");
        sql.push_str(ttl);
    }

    if !spec.settings.is_empty() {
        let pairs: Vec<String> = spec
            .settings
            .iter()
            .map(|(key, value)| format!("{key} = {value}"))
            .collect();
        sql.push_str(" SETTINGS ");
        sql.push_str(&pairs.join(", "));
    }

    if !spec.comment.is_empty() {
        sql.push_str(" COMMENT ");
        sql.push_str(&super::quote_string(&spec.comment));
    }

    sql.push(';');
    Ok(sql)
}

fn validate(spec: &TableSpec) -> Result<()> {
    if spec.database_name.is_empty() {
        return Err(ReconcileError::Validation(
            "database name cannot be empty for CREATE TABLE".to_string(),
        ));
    }
    if spec.name.is_empty() {
        return Err(ReconcileError::Validation(
            "table name cannot be empty for CREATE TABLE".to_string(),
        ));
    }
    if spec.engine.is_empty() {
        return Err(ReconcileError::Validation(
            "engine cannot be empty for CREATE TABLE".to_string(),
        ));
    }
    if spec.columns.is_empty() {
        return Err(ReconcileError::Validation(format!(
            "table '{}.{}' must declare at least one column",
            spec.database_name, spec.name
        )));
    }
    check_comment("table", Some(spec.comment.as_str()))?;
    check_column_comments(&spec.columns)
}
