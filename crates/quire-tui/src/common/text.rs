//! Width-aware text helpers.
//!
//! All measurements are in terminal columns (unicode width), never bytes or
//! chars, so wide characters are handled correctly.

use std::borrow::Cow;

use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Columns kept from an over-budget header before the ellipsis.
const HEADER_ELLIPSIS_RESERVE: usize = 4;

/// Cuts `text` to at most `max_width` columns without adding a marker.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// Shortens header text to its budget.
///
/// Text that fits is returned as is; otherwise the first `budget - 4` columns
/// are kept and `"..."` appended.
pub fn truncate_header(text: &str, budget: usize) -> String {
    if text.width() <= budget {
        return text.to_string();
    }
    let mut out = truncate_to_width(text, budget.saturating_sub(HEADER_ELLIPSIS_RESERVE));
    out.push_str(ELLIPSIS);
    out
}

/// Strips escape characters and expands tabs in untrusted document text.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    if s.contains('\x1b') || s.contains('\t') {
        Cow::Owned(s.replace('\x1b', "").replace('\t', "    "))
    } else {
        Cow::Borrowed(s)
    }
}

pub fn line_width(line: &Line<'_>) -> usize {
    line.spans.iter().map(|span| span.content.width()).sum()
}

/// Truncates or right-pads a line to exactly `width` columns.
pub fn fit_line(line: Line<'static>, width: usize) -> Line<'static> {
    let style = line.style;
    let alignment = line.alignment;
    let mut spans: Vec<Span<'static>> = Vec::with_capacity(line.spans.len() + 1);
    let mut used = 0;

    for span in line.spans {
        if used >= width {
            break;
        }
        let span_width = span.content.width();
        if used + span_width <= width {
            used += span_width;
            spans.push(span);
        } else {
            let cut = truncate_to_width(&span.content, width - used);
            used += cut.width();
            spans.push(Span::styled(cut, span.style));
            break;
        }
    }
    if used < width {
        spans.push(Span::raw(" ".repeat(width - used)));
    }

    let mut fitted = Line::from(spans).style(style);
    fitted.alignment = alignment;
    fitted
}

/// Left-pads a line so it sits centred in `width` columns.
///
/// Lines as wide as or wider than `width` are returned unchanged.
pub fn center_line(line: Line<'static>, width: usize) -> Line<'static> {
    let current = line_width(&line);
    if current >= width {
        return line;
    }
    indent_line(line, (width - current) / 2)
}

/// Shifts a line right by `margin` blank columns.
pub fn indent_line(line: Line<'static>, margin: usize) -> Line<'static> {
    if margin == 0 {
        return line;
    }
    let mut spans = Vec::with_capacity(line.spans.len() + 1);
    spans.push(Span::raw(" ".repeat(margin)));
    spans.extend(line.spans);
    Line::from(spans).style(line.style)
}
