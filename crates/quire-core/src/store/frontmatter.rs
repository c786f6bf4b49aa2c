//! Front-matter splitting.
//!
//! A document may open with a `---` delimited block of `key: value` lines,
//! followed by a blank separator line and then the markdown body:
//!
//! ```text
//! ---
//! title: Hello
//! description: First post
//! ---
//!
//! # Hello
//! ```

use std::collections::BTreeMap;
use std::fmt;

const DELIMITER: &str = "---";

/// Key/value pairs from a document header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: BTreeMap<String, String>,
}

impl Metadata {
    /// Returns the value for `key`, if present and non-empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    fn insert(&mut self, key: &str, value: &str) {
        self.fields.insert(key.to_string(), value.to_string());
    }
}

/// A header that opened with `---` but never closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterError {
    /// Number of header lines read before the input ended.
    pub lines_read: usize,
}

impl fmt::Display for FrontmatterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "front matter opened with `{DELIMITER}` but not closed after {} lines",
            self.lines_read
        )
    }
}

impl std::error::Error for FrontmatterError {}

/// Splits a document into its metadata header and body.
///
/// Without an opening delimiter the whole input is body and the metadata is
/// empty. Header lines are split on the first colon with both sides trimmed;
/// lines without a colon are ignored.
///
/// # Errors
/// Returns `FrontmatterError` when the header is never closed.
pub fn split(content: &str) -> Result<(Metadata, String), FrontmatterError> {
    let mut lines = content.lines();
    match lines.next() {
        Some(first) if first.starts_with(DELIMITER) => {}
        _ => return Ok((Metadata::default(), content.to_string())),
    }

    let mut metadata = Metadata::default();
    let mut lines_read = 0;
    while let Some(line) = lines.next() {
        if line.starts_with(DELIMITER) {
            let mut rest = lines.peekable();
            if rest.peek().is_some_and(|l| l.trim().is_empty()) {
                rest.next();
            }
            let body = rest.collect::<Vec<_>>().join("\n");
            return Ok((metadata, body));
        }

        lines_read += 1;
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                metadata.insert(key, value.trim());
            }
        }
    }

    Err(FrontmatterError { lines_read })
}
