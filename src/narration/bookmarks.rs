//! Bookmark markers embedded in narration text.
//!
//! A marker has the form `<bookmark mark='A'/>` and names the instant at which the speech reaches
//! the following word.

use crate::foundation::error::{GeomotionError, GeomotionResult};
use std::collections::HashSet;

const OPEN: &str = "<bookmark";
const CLOSE: &str = "/>";

/// Lettered label for the `index`-th bookmark: `A`..`Z`, then `AA`, `AB`, ...
pub fn bookmark_label(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Marker text for `mark`.
pub fn bookmark_marker(mark: &str) -> String {
    format!("<bookmark mark='{mark}'/>")
}

/// A bookmark found in narration text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bookmark {
    /// Mark name.
    pub mark: String,
    /// Number of spoken words preceding the marker.
    pub word_index: usize,
}

/// Narration text split into what is spoken and where the bookmarks sit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkedText {
    /// Text with every marker removed and whitespace collapsed.
    pub plain: String,
    /// Bookmarks in text order.
    pub bookmarks: Vec<Bookmark>,
}

impl MarkedText {
    /// Number of spoken words.
    pub fn word_count(&self) -> usize {
        self.plain.split_whitespace().count()
    }
}

/// Strip bookmark markers from `text`, recording each mark's word position.
///
/// Fails on an unterminated marker, a marker without a `mark` attribute, or a repeated mark.
pub fn parse_bookmarks(text: &str) -> GeomotionResult<MarkedText> {
    let mut words: Vec<&str> = Vec::new();
    let mut bookmarks = Vec::new();
    let mut seen = HashSet::new();
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        words.extend(rest[..start].split_whitespace());
        let after = &rest[start + OPEN.len()..];
        let end = after.find(CLOSE).ok_or_else(|| {
            GeomotionError::narration(format!("unterminated bookmark near {:?}", truncate(after)))
        })?;
        let mark = parse_mark(&after[..end])?;
        if !seen.insert(mark.clone()) {
            return Err(GeomotionError::narration(format!(
                "bookmark '{mark}' appears twice"
            )));
        }
        bookmarks.push(Bookmark {
            mark,
            word_index: words.len(),
        });
        rest = &after[end + CLOSE.len()..];
    }
    words.extend(rest.split_whitespace());

    Ok(MarkedText {
        plain: words.join(" "),
        bookmarks,
    })
}

fn parse_mark(attrs: &str) -> GeomotionResult<String> {
    let attrs = attrs.trim();
    let value = attrs
        .strip_prefix("mark")
        .map(str::trim_start)
        .and_then(|s| s.strip_prefix('='))
        .map(str::trim_start)
        .ok_or_else(|| GeomotionError::narration(format!("bookmark without mark: {attrs:?}")))?;
    let quote = value
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| GeomotionError::narration(format!("unquoted bookmark mark: {value:?}")))?;
    let inner = &value[1..];
    let close = inner
        .find(quote)
        .ok_or_else(|| GeomotionError::narration(format!("unterminated mark value: {value:?}")))?;
    let mark = &inner[..close];
    if mark.is_empty() {
        return Err(GeomotionError::narration("empty bookmark mark"));
    }
    Ok(mark.to_owned())
}

fn truncate(s: &str) -> &str {
    match s.char_indices().nth(24) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/bookmarks.rs"]
mod tests;
