//! Greedy word wrapping over styled spans.
//!
//! Prose is split into words at whitespace and refilled so that no line
//! exceeds the wrap width. Code spans keep their inner whitespace. A word
//! wider than the available width is broken at character boundaries.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::{Style, StyledLine, StyledSpan};

/// Prefixes prepended to wrapped lines (list markers, quote bars, indents).
#[derive(Debug, Clone, Default)]
pub struct Indent {
    /// Prefix for the first output line.
    pub first: Vec<StyledSpan>,
    /// Prefix for continuation lines.
    pub rest: Vec<StyledSpan>,
}

impl Indent {
    /// Same prefix on every line.
    pub fn uniform(prefix: Vec<StyledSpan>) -> Self {
        Self {
            first: prefix.clone(),
            rest: prefix,
        }
    }

    /// A marker on the first line and matching blank padding afterwards.
    pub fn hanging(lead: &[StyledSpan], marker: StyledSpan) -> Self {
        let mut first = lead.to_vec();
        let pad = " ".repeat(marker.text.width());
        first.push(marker);
        let mut rest = lead.to_vec();
        rest.push(StyledSpan::new(pad, Style::Plain));
        Self { first, rest }
    }
}

fn spans_width(spans: &[StyledSpan]) -> usize {
    spans.iter().map(|span| span.text.width()).sum()
}

enum Token {
    Word(StyledSpan),
    Space(Style),
    Break,
}

fn is_code(style: Style) -> bool {
    matches!(style, Style::CodeInline | Style::CodeBlock)
}

fn tokenize(spans: &[StyledSpan]) -> Vec<Token> {
    let mut tokens = Vec::new();
    for span in spans {
        if is_code(span.style) {
            for (i, segment) in span.text.split('\n').enumerate() {
                if i > 0 {
                    tokens.push(Token::Break);
                }
                if !segment.is_empty() {
                    tokens.push(Token::Word(StyledSpan::new(segment, span.style)));
                }
            }
            continue;
        }

        let mut word = String::new();
        for ch in span.text.chars() {
            if ch == '\n' || ch.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token::Word(StyledSpan::new(
                        std::mem::take(&mut word),
                        span.style,
                    )));
                }
                tokens.push(if ch == '\n' {
                    Token::Break
                } else {
                    Token::Space(span.style)
                });
            } else {
                word.push(ch);
            }
        }
        if !word.is_empty() {
            tokens.push(Token::Word(StyledSpan::new(word, span.style)));
        }
    }
    tokens
}

struct LineBuilder<'a> {
    width: usize,
    indent: &'a Indent,
    lines: Vec<StyledLine>,
    current: Vec<StyledSpan>,
    used: usize,
    pending_space: Option<Style>,
}

impl<'a> LineBuilder<'a> {
    fn new(width: usize, indent: &'a Indent) -> Self {
        Self {
            width,
            indent,
            lines: Vec::new(),
            current: Vec::new(),
            used: 0,
            pending_space: None,
        }
    }

    fn prefix(&self) -> &'a [StyledSpan] {
        if self.lines.is_empty() {
            &self.indent.first
        } else {
            &self.indent.rest
        }
    }

    fn available(&self) -> usize {
        self.width.saturating_sub(spans_width(self.prefix())).max(1)
    }

    /// Appends text, merging into the previous span when the style matches.
    fn append(&mut self, text: &str, style: Style) {
        self.used += text.width();
        if let Some(last) = self.current.last_mut()
            && last.style == style
        {
            last.text.push_str(text);
            return;
        }
        self.current.push(StyledSpan::new(text, style));
    }

    fn flush(&mut self) {
        let mut spans = self.prefix().to_vec();
        spans.append(&mut self.current);
        self.lines.push(StyledLine { spans });
        self.used = 0;
        self.pending_space = None;
    }

    fn push_word(&mut self, word: &StyledSpan) {
        let width = word.text.width();
        if self.used > 0 {
            let space = usize::from(self.pending_space.is_some());
            if self.used + space + width <= self.available() {
                if let Some(style) = self.pending_space.take() {
                    self.append(" ", style);
                }
                self.append(&word.text, word.style);
                return;
            }
            self.flush();
        }
        self.pending_space = None;

        if width <= self.available() {
            self.append(&word.text, word.style);
            return;
        }

        // Too wide for any line: break at character boundaries.
        let mut piece = String::new();
        let mut piece_width = 0;
        for ch in word.text.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if piece_width + ch_width > self.available() && !piece.is_empty() {
                self.append(&std::mem::take(&mut piece), word.style);
                self.flush();
                piece_width = 0;
            }
            piece.push(ch);
            piece_width += ch_width;
        }
        if !piece.is_empty() {
            self.append(&piece, word.style);
        }
    }

    fn push_space(&mut self, style: Style) {
        if self.used > 0 {
            self.pending_space = Some(style);
        }
    }

    fn finish(mut self) -> Vec<StyledLine> {
        if self.used > 0 || self.lines.is_empty() {
            self.flush();
        }
        self.lines
    }
}

/// Wraps styled spans into lines no wider than `width` columns, prefixes
/// included.
///
/// Always returns at least one line. Runs of whitespace collapse to a single
/// space and whitespace at line edges is dropped; `\n` forces a line break.
pub fn wrap(spans: &[StyledSpan], width: usize, indent: &Indent) -> Vec<StyledLine> {
    let mut builder = LineBuilder::new(width, indent);
    for token in tokenize(spans) {
        match token {
            Token::Word(word) => builder.push_word(&word),
            Token::Space(style) => builder.push_space(style),
            Token::Break => builder.flush(),
        }
    }
    builder.finish()
}
