//! `ALTER TABLE` rendering for column additions and removals.
//!
//! Both forms put every column into a single statement. Unlike CREATE and
//! DROP, the statement carries no trailing semicolon.

use crate::error::{ReconcileError, Result};
use crate::schema::{ColumnSpec, TableTarget};

use super::{check_column_comments, column_definition, quote_identifier, table_head};

pub(super) fn add_columns_sql(target: &TableTarget, columns: &[ColumnSpec]) -> Result<String> {
    validate_target(target)?;
    if columns.is_empty() {
        return Err(ReconcileError::Validation(
            "at least one column is required for ADD COLUMN".to_string(),
        ));
    }
    check_column_comments(columns)?;

    let clauses: Vec<String> = columns
        .iter()
        .map(|c| format!("ADD COLUMN {}", column_definition(c)))
        .collect();

    Ok(format!("ALTER TABLE {} {}", table_head(target), clauses.join(", ")))
}

pub(super) fn drop_columns_sql(target: &TableTarget, columns: &[String]) -> Result<String> {
    validate_target(target)?;
    if columns.is_empty() {
        return Err(ReconcileError::Validation(
            "at least one column name is required for DROP COLUMN".to_string(),
        ));
    }

    let clauses: Vec<String> = columns
        .iter()
        .map(|c| format!("DROP COLUMN {}", quote_identifier(c)))
        .collect();

    Ok(format!("ALTER TABLE {} {}", table_head(target), clauses.join(", ")))
}

fn validate_target(target: &TableTarget) -> Result<()> {
    if target.database.is_empty() {
        return Err(ReconcileError::Validation(
            "database name is required for ALTER TABLE".to_string(),
        ));
    }
    if target.name.is_empty() {
        return Err(ReconcileError::Validation(
            "table name is required for ALTER TABLE".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TableTarget {
        TableTarget::new("mydb", "mytable")
    }

    #[test]
    fn test_add_single_column() {
        let sql = add_columns_sql(&target(), &[ColumnSpec::new("new_col", "String")]).unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE `mydb`.`mytable` ADD COLUMN `new_col` String"
        );
    }

    #[test]
    fn test_add_multiple_columns() {
        let columns = vec![
            ColumnSpec::new("col1", "UInt64"),
            ColumnSpec::new("col2", "String").default("''"),
            ColumnSpec::new("col3", "Float64").comment("Score value"),
        ];
        assert_eq!(
            add_columns_sql(&target(), &columns).unwrap(),
            "ALTER TABLE `mydb`.`mytable` ADD COLUMN `col1` UInt64, \
             ADD COLUMN `col2` String DEFAULT '', \
             ADD COLUMN `col3` Float64 COMMENT 'Score value'"
        );
    }

    #[test]
    fn test_add_column_on_cluster() {
        let target = target().on_cluster(Some("my_cluster".to_string()));
        let sql = add_columns_sql(&target, &[ColumnSpec::new("new_col", "String")]).unwrap();
        assert_eq!(
            sql,
            "ALTER TABLE `mydb`.`mytable` ON CLUSTER 'my_cluster' ADD COLUMN `new_col` String"
        );
    }

    #[test]
    fn test_add_columns_validation() {
        let column = [ColumnSpec::new("a", "String")];
        assert!(matches!(
            add_columns_sql(&target(), &[]),
            Err(ReconcileError::Validation(_))
        ));
        assert!(matches!(
            add_columns_sql(&TableTarget::new("", "t"), &column),
            Err(ReconcileError::Validation(_))
        ));
        assert!(matches!(
            add_columns_sql(&TableTarget::new("db", ""), &column),
            Err(ReconcileError::Validation(_))
        ));
    }

    #[test]
    fn test_add_columns_rejects_long_comment() {
        let column = ColumnSpec::new("a", "String").comment("x".repeat(256));
        let err = add_columns_sql(&target(), &[column]).unwrap_err();
        assert!(matches!(err, ReconcileError::Validation(msg) if msg.contains("column 'a'")));
    }

    #[test]
    fn test_drop_columns() {
        let names = vec!["old_col".to_string(), "legacy".to_string()];
        assert_eq!(
            drop_columns_sql(&target(), &names).unwrap(),
            "ALTER TABLE `mydb`.`mytable` DROP COLUMN `old_col`, DROP COLUMN `legacy`"
        );
    }

    #[test]
    fn test_drop_columns_on_cluster() {
        let target = target().on_cluster(Some("my_cluster".to_string()));
        assert_eq!(
            drop_columns_sql(&target, &["old_col".to_string()]).unwrap(),
            "ALTER TABLE `mydb`.`mytable` ON CLUSTER 'my_cluster' DROP COLUMN `old_col`"
        );
    }

    #[test]
    fn test_drop_columns_validation() {
        assert!(matches!(
            drop_columns_sql(&target(), &[]),
            Err(ReconcileError::Validation(_))
        ));
    }
}
