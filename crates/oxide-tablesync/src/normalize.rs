//! Suppression of drift introduced by the database itself.
//!
//! The catalog does not always echo back what was declared: managed
//! deployments swap engine families for their shared-storage variants, the
//! primary key is inferred from ORDER BY, server-default settings show up,
//! and TTL expressions get reformatted. [`normalize_observed`] folds those
//! differences back into the declared values.

use tracing::debug;

use crate::schema::{TableSpec, TableState};

/// Declared engine family and the family a managed deployment reports.
pub const ENGINE_ALIASES: &[(&str, &str)] = &[
    ("MergeTree", "SharedMergeTree"),
    ("ReplacingMergeTree", "SharedReplacingMergeTree"),
    ("SummingMergeTree", "SharedSummingMergeTree"),
    ("AggregatingMergeTree", "SharedAggregatingMergeTree"),
    ("CollapsingMergeTree", "SharedCollapsingMergeTree"),
    (
        "VersionedCollapsingMergeTree",
        "SharedVersionedCollapsingMergeTree",
    ),
];

/// Returns the engine name without its parameter list.
#[must_use]
pub fn engine_family(engine: &str) -> &str {
    engine
        .split_once('(')
        .map_or(engine, |(family, _)| family)
        .trim()
}

/// Returns true if a declared and an observed engine denote the same family,
/// directly or through [`ENGINE_ALIASES`] in either direction.
#[must_use]
pub fn engines_equivalent(declared: &str, observed: &str) -> bool {
    let declared = engine_family(declared);
    let observed = engine_family(observed);

    declared == observed
        || ENGINE_ALIASES.iter().any(|&(base, shared)| {
            (declared == base && observed == shared) || (declared == shared && observed == base)
        })
}

/// Rewrites an observed table so that database-side transformations of the
/// declared values do not read as drift.
///
/// `cluster_name` and `allow_destructive` are not stored in the catalog and
/// are always taken from `desired`.
#[must_use]
pub fn normalize_observed(mut observed: TableState, desired: &TableSpec) -> TableState {
    let table = &mut observed.table;

    if !desired.engine.is_empty() && engines_equivalent(&desired.engine, &table.engine) {
        if desired.engine != table.engine {
            debug!(
                declared = %desired.engine,
                observed = %table.engine,
                "Keeping declared engine"
            );
        }
        table.engine.clone_from(&desired.engine);
    }

    if desired.primary_key.is_empty() && !table.primary_key.is_empty() {
        table.primary_key.clear();
    }

    table
        .settings
        .retain(|key, _| desired.settings.contains_key(key));

    if desired.ttl.is_some() && table.ttl.is_some() {
        table.ttl.clone_from(&desired.ttl);
    }

    table.cluster_name.clone_from(&desired.cluster_name);
    table.allow_destructive = desired.allow_destructive;

    observed
}
