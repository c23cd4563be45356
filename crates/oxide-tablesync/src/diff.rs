//! Column diffing between a desired and an observed table.
//!
//! Columns are matched by name. Additions are always safe. A removal is
//! either an in-place `DROP COLUMN` (when `allow_destructive` is set), a
//! forced recreation (when the column is part of ORDER BY), or a refusal.
//! A type change on a matched column always forces recreation. Defaults and
//! comments are not compared.
//!
//! Table-level properties (engine, keys, settings, ...) are not diffed here;
//! the configuration layer replaces the table when any of them change.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{ReconcileError, Result};
use crate::schema::ColumnSpec;

/// Why a change cannot be applied in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecreateReason {
    /// A removed column is part of the sorting key.
    OrderByColumnDropped {
        /// The column.
        column: String,
    },
    /// A column keeps its name but changes type.
    ColumnTypeChanged {
        /// The column.
        column: String,
        /// Observed type.
        from: String,
        /// Declared type.
        to: String,
    },
}

impl fmt::Display for RecreateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderByColumnDropped { column } => write!(
                f,
                "column '{column}' in ORDER BY cannot be dropped without recreation"
            ),
            Self::ColumnTypeChanged { column, from, to } => write!(
                f,
                "column '{column}' type change from '{from}' to '{to}' requires recreation"
            ),
        }
    }
}

/// What it takes to turn the observed columns into the desired ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangePlan {
    /// Columns to add, in declared order.
    pub columns_to_add: Vec<ColumnSpec>,
    /// Column names to drop, in observed order.
    pub columns_to_drop: Vec<String>,
    /// Every reason forcing a destroy-then-create cycle.
    pub recreate_reasons: Vec<RecreateReason>,
}

impl ChangePlan {
    /// Returns true if the table has to be destroyed and created again.
    #[must_use]
    pub fn must_recreate(&self) -> bool {
        !self.recreate_reasons.is_empty()
    }

    /// Returns every recreation reason joined into one message.
    #[must_use]
    pub fn recreate_reason(&self) -> Option<String> {
        if self.recreate_reasons.is_empty() {
            return None;
        }
        Some(
            self.recreate_reasons
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Returns true if nothing needs to change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns_to_add.is_empty()
            && self.columns_to_drop.is_empty()
            && self.recreate_reasons.is_empty()
    }
}

/// Compares desired columns against observed columns.
///
/// `order_by` is the observed sorting key. Fails with
/// [`ReconcileError::DestructiveChangeDenied`] naming every column whose
/// removal needs `allow_destructive`.
pub fn diff_columns(
    desired: &[ColumnSpec],
    observed: &[ColumnSpec],
    order_by: &[String],
    allow_destructive: bool,
) -> Result<ChangePlan> {
    let desired_by_name: HashMap<&str, &ColumnSpec> =
        desired.iter().map(|c| (c.name.as_str(), c)).collect();
    let observed_names: HashSet<&str> = observed.iter().map(|c| c.name.as_str()).collect();
    let order_by: HashSet<&str> = order_by.iter().map(String::as_str).collect();

    let mut plan = ChangePlan {
        columns_to_add: desired
            .iter()
            .filter(|c| !observed_names.contains(c.name.as_str()))
            .cloned()
            .collect(),
        ..ChangePlan::default()
    };
    let mut denied = Vec::new();

    for column in observed {
        match desired_by_name.get(column.name.as_str()) {
            None if order_by.contains(column.name.as_str()) => {
                plan.recreate_reasons
                    .push(RecreateReason::OrderByColumnDropped {
                        column: column.name.clone(),
                    });
            }
            None if !allow_destructive => denied.push(column.name.as_str()),
            None => plan.columns_to_drop.push(column.name.clone()),
            Some(wanted) if wanted.column_type != column.column_type => {
                plan.recreate_reasons
                    .push(RecreateReason::ColumnTypeChanged {
                        column: column.name.clone(),
                        from: column.column_type.clone(),
                        to: wanted.column_type.clone(),
                    });
            }
            Some(_) => {}
        }
    }

    if !denied.is_empty() {
        let names: Vec<String> = denied.iter().map(|n| format!("'{n}'")).collect();
        return Err(ReconcileError::DestructiveChangeDenied {
            object: format!("columns {}", names.join(", ")),
        });
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(specs: &[(&str, &str)]) -> Vec<ColumnSpec> {
        specs
            .iter()
            .map(|(name, ty)| ColumnSpec::new(*name, *ty))
            .collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_no_changes() {
        let columns = cols(&[("id", "UInt64"), ("ts", "DateTime")]);
        let plan = diff_columns(&columns, &columns, &names(&["id"]), false).unwrap();
        assert!(plan.is_empty());
        assert!(!plan.must_recreate());
        assert_eq!(plan.recreate_reason(), None);
    }

    #[test]
    fn test_add_and_drop() {
        let desired = cols(&[("a", "String"), ("b", "String")]);
        let observed = cols(&[("a", "String"), ("c", "String")]);

        let plan = diff_columns(&desired, &observed, &names(&["a"]), true).unwrap();
        assert_eq!(plan.columns_to_add, cols(&[("b", "String")]));
        assert_eq!(plan.columns_to_drop, names(&["c"]));
        assert!(!plan.must_recreate());
    }

    #[test]
    fn test_added_columns_keep_declared_order() {
        let desired = cols(&[("id", "UInt64"), ("z", "String"), ("a", "String")]);
        let observed = cols(&[("id", "UInt64")]);

        let plan = diff_columns(&desired, &observed, &[], false).unwrap();
        let added: Vec<&str> = plan
            .columns_to_add
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(added, vec!["z", "a"]);
    }

    #[test]
    fn test_drop_denied_without_authorization() {
        let desired = cols(&[("id", "UInt64")]);
        let observed = cols(&[("id", "UInt64"), ("legacy", "String"), ("old", "String")]);

        let err = diff_columns(&desired, &observed, &names(&["id"]), false).unwrap_err();
        match err {
            ReconcileError::DestructiveChangeDenied { object } => {
                assert_eq!(object, "columns 'legacy', 'old'");
            }
            other => panic!("Expected DestructiveChangeDenied, got {other:?}"),
        }
    }

    #[test]
    fn test_order_by_drop_forces_recreation_regardless_of_flag() {
        let desired = cols(&[("ts", "DateTime")]);
        let observed = cols(&[("id", "UInt64"), ("ts", "DateTime")]);

        for allow in [true, false] {
            let plan = diff_columns(&desired, &observed, &names(&["id"]), allow).unwrap();
            assert!(plan.must_recreate());
            assert!(plan.columns_to_drop.is_empty());
            assert_eq!(
                plan.recreate_reasons,
                vec![RecreateReason::OrderByColumnDropped {
                    column: "id".to_string(),
                }]
            );
        }
    }

    #[test]
    fn test_type_change_forces_recreation() {
        let desired = cols(&[("id", "UInt64"), ("n", "Int64")]);
        let observed = cols(&[("id", "UInt64"), ("n", "Int32")]);

        let plan = diff_columns(&desired, &observed, &names(&["id"]), false).unwrap();
        assert!(plan.must_recreate());
        assert_eq!(
            plan.recreate_reason().unwrap(),
            "column 'n' type change from 'Int32' to 'Int64' requires recreation"
        );
    }

    #[test]
    fn test_default_and_comment_are_not_compared() {
        let ts = ColumnSpec::new("ts", "DateTime")
            .default("now()")
            .comment("event time");
        let observed = cols(&[("ts", "DateTime")]);

        let plan = diff_columns(&[ts], &observed, &[], false).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_multiple_reasons_are_joined() {
        let desired = cols(&[("n", "Int64")]);
        let observed = cols(&[("id", "UInt64"), ("n", "Int32")]);

        let plan = diff_columns(&desired, &observed, &names(&["id"]), true).unwrap();
        assert_eq!(plan.recreate_reasons.len(), 2);
        assert!(plan.recreate_reason().unwrap().contains("; "));
    }
}
