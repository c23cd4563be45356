//! Catalog SELECT rendering.

use super::{non_empty, quote_identifier, quote_string};

/// A SELECT against one of the `system` catalog tables, filtered by
/// string equality on each `(column, value)` pair.
#[derive(Debug, Clone, Copy)]
pub struct SelectQuery<'a> {
    /// Columns to return, in order.
    pub columns: &'a [&'a str],
    /// Table inside the `system` database, e.g. `tables`.
    pub system_table: &'a str,
    /// Equality filters joined with AND.
    pub filters: &'a [(&'a str, &'a str)],
    /// When set, the query reads every replica of the cluster.
    pub cluster: Option<&'a str>,
}

impl SelectQuery<'_> {
    /// Renders the query.
    #[must_use]
    pub fn build(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| quote_identifier(c)).collect();

        let source = format!(
            "{}.{}",
            quote_identifier("system"),
            quote_identifier(self.system_table)
        );
        let source = match non_empty(self.cluster) {
            Some(cluster) => format!("clusterAllReplicas({}, {source})", quote_string(cluster)),
            None => source,
        };

        let mut sql = format!("SELECT {} FROM {source}", columns.join(", "));

        if !self.filters.is_empty() {
            let conditions: Vec<String> = self
                .filters
                .iter()
                .map(|(column, value)| {
                    format!("{} = {}", quote_identifier(column), quote_string(value))
                })
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        sql
    }
}
