//! Bracket and quote aware scanning of catalog expressions.

/// Yields the characters of `text` that sit outside every bracket pair and
/// quoted section. Brackets and quote delimiters themselves are skipped.
pub(crate) fn top_level_chars(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    text.char_indices().filter(move |&(_, c)| {
        if let Some(delimiter) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == delimiter {
                quote = None;
            }
            return false;
        }
        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                false
            }
            '(' | '[' => {
                depth += 1;
                false
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        }
    })
}

/// Splits on `separator` wherever it appears at the top level.
pub(crate) fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in top_level_chars(text) {
        if c == separator {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Finds `keyword` at the top level, starting a word.
pub(crate) fn find_keyword(text: &str, keyword: &str) -> Option<usize> {
    top_level_chars(text).map(|(i, _)| i).find(|&i| {
        let preceding = text[..i].chars().next_back();
        text[i..].starts_with(keyword) && preceding.is_none_or(char::is_whitespace)
    })
}
