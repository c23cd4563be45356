//! Key expression parsing.

use super::text::split_top_level;

/// Splits a `sorting_key`/`primary_key`/`sampling_key` expression into its
/// elements.
///
/// Commas inside function calls do not split, so `intHash32(a, b), c` yields
/// two elements. A backtick-quoted element is unquoted.
#[must_use]
pub fn parse_key_columns(key: &str) -> Vec<String> {
    split_top_level(key, ',')
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(unquote)
        .collect()
}

fn unquote(part: &str) -> String {
    part.strip_prefix('`')
        .and_then(|p| p.strip_suffix('`'))
        .filter(|inner| !inner.contains('`'))
        .unwrap_or(part)
        .to_string()
}
