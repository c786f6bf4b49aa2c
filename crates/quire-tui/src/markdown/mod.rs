//! Markdown to styled terminal lines.
//!
//! - `render_markdown()`: parse with pulldown-cmark into semantic `StyledLine`s
//! - `wrap`: width-aware word wrapping that keeps styles across breaks
//! - `PulldownConverter`: the default `MarkdownConverter`

mod parse;
mod wrap;

use ratatui::text::Line;

pub use parse::render_markdown;

use crate::cache::{MarkdownConverter, RenderError};
use crate::common::text::sanitize_for_display;

/// `MarkdownConverter` backed by pulldown-cmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownConverter;

impl MarkdownConverter for PulldownConverter {
    fn convert(&self, text: &str, width: usize) -> Result<Vec<Line<'static>>, RenderError> {
        if width == 0 {
            return Err(RenderError::new("wrap width must be at least one column"));
        }
        let text = sanitize_for_display(text);
        Ok(render_markdown(&text, width)
            .into_iter()
            .map(crate::theme::StyledLine::into_line)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::line_width;

    #[test]
    fn test_converter_respects_width() {
        let lines = PulldownConverter
            .convert("word ".repeat(40).as_str(), 20)
            .unwrap();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| line_width(l) <= 20));
    }

    #[test]
    fn test_converter_is_deterministic() {
        let text = "# Hi\n\nSome *text* with `code`.";
        assert_eq!(
            PulldownConverter.convert(text, 30).unwrap(),
            PulldownConverter.convert(text, 30).unwrap()
        );
    }

    #[test]
    fn test_zero_width_is_an_error() {
        assert!(PulldownConverter.convert("x", 0).is_err());
    }

    #[test]
    fn test_escape_sequences_are_removed() {
        let lines = PulldownConverter.convert("a\x1b[2Jb", 20).unwrap();
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(!text.contains('\x1b'));
    }
}
