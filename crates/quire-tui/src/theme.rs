//! Styled text primitives and the color palette.
//!
//! Markdown rendering produces `StyledLine`s tagged with semantic `Style`s;
//! they are turned into ratatui lines only at the converter boundary, so the
//! markdown code stays free of terminal concerns.

use ratatui::style::{Color, Modifier};
use ratatui::text::{Line, Span};

const NORMAL: Color = Color::Rgb(0xD7, 0xD7, 0xD7);
const SUBTLE: Color = Color::Rgb(0x7C, 0x7C, 0x7C);
const MUTED: Color = Color::Rgb(0x3F, 0x3F, 0x3F);
const HIGHLIGHT: Color = Color::Rgb(0xF9, 0x3E, 0xFD);
const CODE: Color = Color::Rgb(0xE8, 0xA8, 0x5C);
const LINK: Color = Color::Rgb(0x5F, 0xAF, 0xFF);

/// A styled span of text (UI-agnostic).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: Style,
}

impl StyledSpan {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A line of styled spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the line has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|span| span.text.trim().is_empty())
    }

    pub fn into_line(self) -> Line<'static> {
        Line::from(
            self.spans
                .into_iter()
                .map(|span| Span::styled(span.text, style(span.style)))
                .collect::<Vec<_>>(),
        )
    }
}

/// Semantic style identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// No styling.
    Plain,
    /// Regular prose and chrome text.
    Normal,
    /// Secondary text (descriptions, key labels).
    Subtle,
    /// Separators and borders.
    Muted,
    /// Key hints and the selected list item.
    Highlight,

    // Markdown styles
    H1,
    H2,
    /// Heading level 3 and below.
    H3,
    Strong,
    Emphasis,
    Strikethrough,
    CodeInline,
    CodeBlock,
    Link,
    BlockQuote,
    ListBullet,
    ListNumber,
}

/// Maps a semantic style to a terminal style.
pub fn style(style: Style) -> ratatui::style::Style {
    let base = ratatui::style::Style::default();
    match style {
        Style::Plain => base,
        Style::Normal => base.fg(NORMAL),
        Style::Subtle => base.fg(SUBTLE),
        Style::Muted => base.fg(MUTED),
        Style::Highlight => base.fg(HIGHLIGHT),
        Style::H1 => base
            .fg(HIGHLIGHT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        Style::H2 => base.fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
        Style::H3 | Style::Strong => base.fg(NORMAL).add_modifier(Modifier::BOLD),
        Style::Emphasis => base.fg(NORMAL).add_modifier(Modifier::ITALIC),
        Style::Strikethrough => base.fg(SUBTLE).add_modifier(Modifier::CROSSED_OUT),
        Style::CodeInline | Style::CodeBlock => base.fg(CODE),
        Style::Link => base.fg(LINK).add_modifier(Modifier::UNDERLINED),
        Style::BlockQuote => base.fg(SUBTLE).add_modifier(Modifier::ITALIC),
        Style::ListBullet | Style::ListNumber => base.fg(SUBTLE),
    }
}

/// Shorthand for a span in a semantic style.
pub fn span(text: impl Into<String>, semantic: Style) -> Span<'static> {
    Span::styled(text.into(), style(semantic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_detection() {
        assert!(StyledLine::empty().is_blank());
        assert!(
            StyledLine {
                spans: vec![StyledSpan::new("   ", Style::Plain)],
            }
            .is_blank()
        );
        assert!(
            !StyledLine {
                spans: vec![StyledSpan::new(" x ", Style::Normal)],
            }
            .is_blank()
        );
    }

    #[test]
    fn test_into_line_keeps_text_and_style() {
        let line = StyledLine {
            spans: vec![
                StyledSpan::new("a", Style::Strong),
                StyledSpan::new("b", Style::Link),
            ],
        }
        .into_line();
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "a");
        assert_eq!(line.spans[1].style, style(Style::Link));
    }
}
