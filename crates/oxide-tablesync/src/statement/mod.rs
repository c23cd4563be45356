//! DDL and catalog statement rendering.
//!
//! Every statement is described by an immutable value and rendered in one
//! pass. Identifiers are backtick-quoted, string literals single-quoted.
//! Type, default, partition, sampling and TTL expressions are sub-expressions
//! of the target language and are passed through unescaped.

mod alter;
mod create;
mod drop;
mod select;

pub use select::SelectQuery;

use crate::error::{ReconcileError, Result};
use crate::schema::{ColumnSpec, TableSpec, TableTarget};

/// A DDL statement ready to be rendered.
#[derive(Debug, Clone, Copy)]
pub enum DdlStatement<'a> {
    /// `CREATE TABLE`.
    CreateTable(&'a TableSpec),
    /// `DROP TABLE`.
    DropTable(&'a TableTarget),
    /// `ALTER TABLE ... ADD COLUMN`.
    AddColumns {
        /// Table to alter.
        target: &'a TableTarget,
        /// Columns to add, in order.
        columns: &'a [ColumnSpec],
    },
    /// `ALTER TABLE ... DROP COLUMN`.
    DropColumns {
        /// Table to alter.
        target: &'a TableTarget,
        /// Column names to drop, in order.
        columns: &'a [String],
    },
}

impl DdlStatement<'_> {
    /// Validates the statement and renders it.
    pub fn build(&self) -> Result<String> {
        match self {
            Self::CreateTable(spec) => create::create_table_sql(spec),
            Self::DropTable(target) => drop::drop_table_sql(target),
            Self::AddColumns { target, columns } => alter::add_columns_sql(target, columns),
            Self::DropColumns { target, columns } => alter::drop_columns_sql(target, columns),
        }
    }
}

/// Renders a `CREATE TABLE` statement.
pub fn build_create(spec: &TableSpec) -> Result<String> {
    DdlStatement::CreateTable(spec).build()
}

/// Renders a `DROP TABLE` statement.
pub fn build_drop(target: &TableTarget) -> Result<String> {
    DdlStatement::DropTable(target).build()
}

/// Renders a single `ALTER TABLE` adding every column.
pub fn build_add_columns(target: &TableTarget, columns: &[ColumnSpec]) -> Result<String> {
    DdlStatement::AddColumns { target, columns }.build()
}

/// Renders a single `ALTER TABLE` dropping every named column.
pub fn build_drop_columns(target: &TableTarget, columns: &[String]) -> Result<String> {
    DdlStatement::DropColumns { target, columns }.build()
}

/// Quotes an identifier (database, table or column name).
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", escape(name, '`'))
}

/// Quotes a string literal (comments, cluster names, lookup values).
#[must_use]
pub fn quote_string(value: &str) -> String {
    format!("'{}'", escape(value, '\''))
}

fn escape(value: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == delimiter {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `` `db`.`table` `` followed by ` ON CLUSTER 'c'` when a cluster is set.
fn table_head(target: &TableTarget) -> String {
    let mut sql = format!(
        "{}.{}",
        quote_identifier(&target.database),
        quote_identifier(&target.name)
    );
    if let Some(cluster) = non_empty(target.cluster.as_deref()) {
        sql.push_str(" ON CLUSTER ");
        sql.push_str(&quote_string(cluster));
    }
    sql
}

/// Longest table or column comment accepted, in characters.
pub const MAX_COMMENT_CHARS: usize = 255;

fn check_comment(owner: &str, comment: Option<&str>) -> Result<()> {
    let Some(comment) = comment else {
        return Ok(());
    };
    let chars = comment.chars().count();
    if chars > MAX_COMMENT_CHARS {
        return Err(ReconcileError::Validation(format!(
            "comment on {owner} has {chars} characters, the limit is {MAX_COMMENT_CHARS}"
        )));
    }
    Ok(())
}

fn check_column_comments(columns: &[ColumnSpec]) -> Result<()> {
    for column in columns {
        let owner = format!("column '{}'", column.name);
        check_comment(&owner, column.comment.as_deref())?;
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// `` `name` Type [DEFAULT expr] [COMMENT 'c'] ``
fn column_definition(column: &ColumnSpec) -> String {
    let mut parts = vec![quote_identifier(&column.name), column.column_type.clone()];

    if let Some(default) = non_empty(column.default.as_deref()) {
        parts.push(format!("DEFAULT {default}"));
    }

    if let Some(comment) = non_empty(column.comment.as_deref()) {
        parts.push(format!("COMMENT {}", quote_string(comment)));
    }

    parts.join(" ")
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| quote_identifier(n))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("events"), "`events`");
        assert_eq!(quote_identifier("we`ird"), "`we\\`ird`");
        assert_eq!(quote_identifier("back\\slash"), "`back\\\\slash`");
    }

    #[test]
    fn test_quote_string() {
        assert_eq!(quote_string("hello"), "'hello'");
        assert_eq!(quote_string("it's"), "'it\\'s'");
        assert_eq!(quote_string(""), "''");
    }

    #[test]
    fn test_column_definition() {
        let col = ColumnSpec::new("created_at", "DateTime")
            .default("now()")
            .comment("Creation time");
        assert_eq!(
            column_definition(&col),
            "`created_at` DateTime DEFAULT now() COMMENT 'Creation time'"
        );
    }

    #[test]
    fn test_column_definition_skips_empty_extras() {
        let col = ColumnSpec::new("name", "String").default("").comment("");
        assert_eq!(column_definition(&col), "`name` String");
    }

    #[test]
    fn test_table_head_with_cluster() {
        let target = TableTarget::new("db", "t").on_cluster(Some("main".to_string()));
        assert_eq!(table_head(&target), "`db`.`t` ON CLUSTER 'main'");

        let target = TableTarget::new("db", "t").on_cluster(Some(String::new()));
        assert_eq!(table_head(&target), "`db`.`t`");
    }
}
