//! Memoized markdown conversion.
//!
//! Conversion is the expensive step of building a page, so every converted
//! block is kept per `(BlockKey, width)` for the rest of the session. A
//! resize back to an earlier width finds its blocks still there, and content
//! never changes while a server runs, so nothing is ever evicted.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use quire_core::DocumentPath;
use ratatui::text::Line;
use tracing::debug;

/// Converter failure; fatal to the session that hit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "render failed: {}", self.message)
    }
}

impl std::error::Error for RenderError {}

/// Converts markdown to styled lines wrapped at a column width.
///
/// Implementations must be deterministic for a given `(text, width)` pair.
pub trait MarkdownConverter: Send + Sync {
    /// # Errors
    /// Returns `RenderError` when the text cannot be converted.
    fn convert(&self, text: &str, width: usize) -> Result<Vec<Line<'static>>, RenderError>;
}

/// Identity of a renderable block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKey {
    /// Full body of a document.
    Document(DocumentPath),
    /// Preview card for a document on the landing view.
    Card(DocumentPath),
}

/// A converted block at one wrap width.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub key: BlockKey,
    pub width: usize,
    pub lines: Vec<Line<'static>>,
}

impl RenderedBlock {
    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

fn is_blank(line: &Line<'_>) -> bool {
    line.spans.iter().all(|span| span.content.trim().is_empty())
}

/// Per-session conversion cache.
pub struct RenderCache {
    converter: Arc<dyn MarkdownConverter>,
    entries: HashMap<(BlockKey, usize), Arc<RenderedBlock>>,
    misses: usize,
}

impl RenderCache {
    pub fn new(converter: Arc<dyn MarkdownConverter>) -> Self {
        Self {
            converter,
            entries: HashMap::new(),
            misses: 0,
        }
    }

    /// Returns the converted block for `key` at `width`, converting on a miss.
    ///
    /// One leading and one trailing blank line are stripped from fresh
    /// conversions so blocks stack without double gaps.
    ///
    /// # Errors
    /// Propagates the converter's `RenderError`; nothing is cached then.
    pub fn render(
        &mut self,
        key: &BlockKey,
        text: &str,
        width: usize,
    ) -> Result<Arc<RenderedBlock>, RenderError> {
        let slot = (key.clone(), width);
        if let Some(block) = self.entries.get(&slot) {
            return Ok(Arc::clone(block));
        }

        self.misses += 1;
        debug!(?key, width, "converting block");
        let mut lines = self.converter.convert(text, width)?;
        if lines.first().is_some_and(is_blank) {
            lines.remove(0);
        }
        if lines.last().is_some_and(is_blank) {
            lines.pop();
        }

        let block = Arc::new(RenderedBlock {
            key: key.clone(),
            width,
            lines,
        });
        self.entries.insert(slot, Arc::clone(&block));
        Ok(block)
    }

    /// Number of converter calls so far.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RenderCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCache")
            .field("entries", &self.entries.len())
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingConverter, FailingConverter};

    fn key(path: &str) -> BlockKey {
        BlockKey::Document(DocumentPath::new(path))
    }

    #[test]
    fn test_hit_returns_same_block_without_conversion() {
        let converter = Arc::new(CountingConverter::default());
        let mut cache = RenderCache::new(converter.clone());

        let first = cache.render(&key("a"), "text", 40).unwrap();
        let second = cache.render(&key("a"), "text", 40).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(converter.calls(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_width_is_part_of_the_key() {
        let converter = Arc::new(CountingConverter::default());
        let mut cache = RenderCache::new(converter.clone());

        cache.render(&key("a"), "text", 40).unwrap();
        cache.render(&key("a"), "text", 39).unwrap();
        cache.render(&BlockKey::Card(DocumentPath::new("a")), "text", 40).unwrap();

        assert_eq!(converter.calls(), 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_strips_single_leading_and_trailing_blank() {
        let converter = Arc::new(CountingConverter::with_padding(2));
        let mut cache = RenderCache::new(converter);

        let block = cache.render(&key("a"), "x", 10).unwrap();
        // Two blank lines on each side; one is stripped from each.
        assert_eq!(block.height(), 3);
        assert!(is_blank(&block.lines[0]));
        assert!(!is_blank(&block.lines[1]));
    }

    #[test]
    fn test_widths_are_cached_side_by_side() {
        let converter = Arc::new(CountingConverter::default());
        let mut cache = RenderCache::new(converter.clone());

        let wide = cache.render(&key("a"), "text", 80).unwrap();
        cache.render(&key("a"), "text", 66).unwrap();
        let again = cache.render(&key("a"), "text", 80).unwrap();

        assert!(Arc::ptr_eq(&wide, &again));
        assert_eq!(converter.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_converter_error_is_not_cached() {
        let mut cache = RenderCache::new(Arc::new(FailingConverter));
        let err = cache.render(&key("a"), "text", 40).unwrap_err();
        assert!(err.to_string().contains("render failed"));
        assert!(cache.is_empty());
    }
}
