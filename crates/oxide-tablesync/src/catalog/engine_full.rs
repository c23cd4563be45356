//! Best-effort extraction of TTL and SETTINGS from `system.tables.engine_full`.
//!
//! This is a textual scan, not an expression parser. Callers only see
//! [`parse`] and [`EngineClauses`].

use std::collections::BTreeMap;

use super::text::{find_keyword, split_top_level};

const TTL_KEYWORD: &str = "TTL ";
const SETTINGS_KEYWORD: &str = "SETTINGS ";

/// Clauses recovered from an engine descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineClauses {
    /// Table TTL expression, without the `TTL` keyword.
    pub ttl: Option<String>,
    /// `key = value` pairs of the SETTINGS clause.
    pub settings: BTreeMap<String, String>,
}

/// Scans an engine descriptor such as
/// `MergeTree ORDER BY id TTL ts + toIntervalDay(1) SETTINGS index_granularity = 8192`.
#[must_use]
pub fn parse(engine_full: &str) -> EngineClauses {
    let settings_at = find_keyword(engine_full, SETTINGS_KEYWORD);

    let ttl = find_keyword(engine_full, TTL_KEYWORD).and_then(|at| {
        let start = at + TTL_KEYWORD.len();
        let end = settings_at
            .filter(|&s| s >= start)
            .unwrap_or(engine_full.len());
        let expr = engine_full[start..end].trim();
        (!expr.is_empty()).then(|| expr.to_string())
    });

    let settings = settings_at
        .map(|at| parse_settings(&engine_full[at + SETTINGS_KEYWORD.len()..]))
        .unwrap_or_default();

    EngineClauses { ttl, settings }
}

fn parse_settings(clause: &str) -> BTreeMap<String, String> {
    split_top_level(clause, ',')
        .into_iter()
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            (!key.is_empty()).then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}
