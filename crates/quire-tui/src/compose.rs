//! Frame composition: header, body and footer into one fixed rectangle.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::common::{Scrollbar, center_line, fit_line, truncate_header};
use crate::layout::{ColumnMode, FOOTER_HEIGHT, HEADER_HEIGHT, LayoutPlan};
use crate::state::Location;
use crate::theme::{Style, span};
use crate::viewport::SyncCommand;

/// Width of the header's action cell, borders excluded.
const SIDE_CELL_WIDTH: usize = 11;
/// Blank columns on each side of the header text.
const HEADER_PADDING: usize = 2;
const HELP_SEPARATOR: &str = " • ";

/// One composed screen: exactly `height` lines of exactly `width` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub lines: Vec<Line<'static>>,
    /// First body row.
    pub body_top: u16,
    pub body_height: u16,
    pub scrollbar: Option<Scrollbar>,
    /// The body rows are left blank for the renderer's synced scroll region.
    pub synced_body: bool,
}

impl Frame {
    pub fn body_area(&self) -> Rect {
        Rect::new(0, self.body_top, self.width, self.body_height)
    }

    /// Draws a sync snapshot into its scroll region.
    ///
    /// Rows outside the frame are ignored; rows of the region past the end
    /// of the snapshot are blanked.
    pub fn apply_sync(&mut self, sync: &SyncCommand) {
        let width = usize::from(self.width);
        for (i, row) in (sync.top..sync.bottom).enumerate() {
            let Some(slot) = self.lines.get_mut(usize::from(row)) else {
                break;
            };
            let line = sync.lines.get(i).cloned().unwrap_or_default();
            *slot = fit_line(line, width);
        }
    }
}

impl Widget for &Frame {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row, line) in self.lines.iter().enumerate() {
            let y = area.y + row as u16;
            if y >= area.bottom() {
                break;
            }
            buf.set_line(area.x, y, line, area.width);
        }
        if let Some(scrollbar) = self.scrollbar {
            scrollbar.render(self.body_area().intersection(area), buf);
        }
    }
}

fn take_rows(
    lines: Vec<Line<'static>>,
    rows: usize,
    width: usize,
) -> impl Iterator<Item = Line<'static>> {
    lines
        .into_iter()
        .chain(std::iter::repeat_with(Line::default))
        .take(rows)
        .map(move |line| fit_line(line, width))
}

/// Builds an exact `width` x `height` frame.
///
/// The header gets up to `HEADER_HEIGHT` rows, then the footer up to
/// `FOOTER_HEIGHT`, and the body whatever is left; each section is cut or
/// padded with blank rows to its size, so the footer never moves with the
/// body's length.
pub fn compose(
    header: Vec<Line<'static>>,
    body: Vec<Line<'static>>,
    footer: Vec<Line<'static>>,
    width: u16,
    height: u16,
) -> Frame {
    let header_rows = HEADER_HEIGHT.min(height);
    let footer_rows = FOOTER_HEIGHT.min(height - header_rows);
    let body_rows = height - header_rows - footer_rows;
    let cols = usize::from(width);

    let mut lines = Vec::with_capacity(usize::from(height));
    lines.extend(take_rows(header, usize::from(header_rows), cols));
    lines.extend(take_rows(body, usize::from(body_rows), cols));
    lines.extend(take_rows(footer, usize::from(footer_rows), cols));

    Frame {
        width,
        height,
        lines,
        body_top: header_rows,
        body_height: body_rows,
        scrollbar: None,
        synced_body: false,
    }
}

fn border_row(
    left: &str,
    mid: &str,
    right: &str,
    main: usize,
    side: Option<usize>,
) -> Line<'static> {
    let mut text = String::from(left);
    text.push_str(&"─".repeat(main));
    if let Some(side) = side {
        text.push_str(mid);
        text.push_str(&"─".repeat(side));
    }
    text.push_str(right);
    Line::from(span(text, Style::Muted))
}

fn action_label(location: &Location) -> (&'static str, &'static str) {
    match location {
        Location::Root => ("p", "posts"),
        Location::List | Location::Detail(_) => ("b", "back"),
    }
}

/// Header rows, `content_width` columns wide.
///
/// A bordered box holding the site name and location path. In dual mode a
/// side cell shows the contextual action; in single mode it is dropped and
/// the footer carries the hint instead.
pub fn header_lines(
    plan: &LayoutPlan,
    location: &Location,
    site_name: &str,
) -> Vec<Line<'static>> {
    let width = usize::from(plan.content_width);
    let side = (plan.column_mode == ColumnMode::Dual).then_some(SIDE_CELL_WIDTH);
    let chrome = 2 + side.map_or(0, |cell| cell + 1);
    let main = width.saturating_sub(chrome);
    let budget = main.saturating_sub(2 * HEADER_PADDING);

    let title = truncate_header(&format!("{site_name} {}", location.display_path()), budget);
    let used = 1 + HEADER_PADDING + title.width();
    let mut row: Vec<Span<'static>> = vec![
        span("│", Style::Muted),
        span(" ".repeat(HEADER_PADDING), Style::Plain),
        span(title, Style::Normal),
        span(" ".repeat((1 + main).saturating_sub(used)), Style::Plain),
    ];
    if let Some(cell) = side {
        let (key, label) = action_label(location);
        let text_width = key.len() + 1 + label.len();
        let left = cell.saturating_sub(text_width) / 2;
        let right = cell.saturating_sub(text_width + left);
        row.push(span("│", Style::Muted));
        row.push(span(" ".repeat(left), Style::Plain));
        row.push(span(key, Style::Highlight));
        row.push(span(format!(" {label}"), Style::Subtle));
        row.push(span(" ".repeat(right), Style::Plain));
    }
    row.push(span("│", Style::Muted));

    vec![
        fit_line(border_row("╭", "┬", "╮", main, side), width),
        fit_line(Line::from(row), width),
        fit_line(border_row("╰", "┴", "╯", main, side), width),
        Line::default(),
    ]
}

fn help_items(plan: &LayoutPlan, location: &Location) -> Vec<(&'static str, &'static str)> {
    let mut items = Vec::new();
    if plan.column_mode == ColumnMode::Single {
        items.push(action_label(location));
    }
    match location {
        Location::List => {
            items.push(("▲/▼", "select"));
            items.push(("enter", "open"));
        }
        Location::Root | Location::Detail(_) => items.push(("▲/▼", "scroll")),
    }
    items.push(("q", "quit"));
    items
}

/// Footer rows, `content_width` columns wide: rule, blank, key help, blank.
pub fn footer_lines(plan: &LayoutPlan, location: &Location) -> Vec<Line<'static>> {
    let width = usize::from(plan.content_width);
    let mut spans = Vec::new();
    for (i, (key, label)) in help_items(plan, location).into_iter().enumerate() {
        if i > 0 {
            spans.push(span(HELP_SEPARATOR, Style::Muted));
        }
        spans.push(span(key, Style::Subtle));
        spans.push(span(format!(" {label}"), Style::Muted));
    }
    let help = center_line(Line::from(spans), width);

    vec![
        Line::from(span("─".repeat(width), Style::Muted)),
        Line::default(),
        fit_line(help, width),
        Line::default(),
    ]
}

#[cfg(test)]
mod tests {
    use quire_core::DocumentPath;

    use super::*;
    use crate::common::line_width;
    use crate::layout::compute_layout;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_compose_exact_size() {
        let frame = compose(
            vec![Line::from("header")],
            (0..50).map(|i| Line::from(format!("body {i}"))).collect(),
            vec![Line::from("footer")],
            40,
            30,
        );
        assert_eq!(frame.lines.len(), 30);
        assert!(frame.lines.iter().all(|l| line_width(l) == 40));
        assert_eq!(frame.body_top, 4);
        assert_eq!(frame.body_height, 22);
        assert!(text(&frame.lines[4]).starts_with("body 0"));
        assert!(text(&frame.lines[25]).starts_with("body 21"));
        assert!(text(&frame.lines[26]).starts_with("footer"));
    }

    #[test]
    fn test_short_body_keeps_footer_in_place() {
        let frame = compose(vec![], vec![Line::from("x")], vec![Line::from("footer")], 20, 12);
        assert_eq!(frame.lines.len(), 12);
        assert!(text(&frame.lines[8]).starts_with("footer"));
        assert_eq!(text(&frame.lines[5]).trim(), "");
    }

    #[test]
    fn test_tiny_terminal_prefers_header_then_footer() {
        let frame = compose(
            vec![Line::from("h")],
            vec![Line::from("b")],
            vec![Line::from("f")],
            10,
            6,
        );
        assert_eq!(frame.lines.len(), 6);
        assert_eq!(frame.body_height, 0);
        assert!(text(&frame.lines[4]).starts_with('f'));

        let frame = compose(vec![Line::from("h")], vec![], vec![Line::from("f")], 10, 3);
        assert_eq!(frame.lines.len(), 3);
        assert!(text(&frame.lines[0]).starts_with('h'));
    }

    #[test]
    fn test_header_dual_budget() {
        let plan = compute_layout(100, 30, &Location::Root);
        let lines = header_lines(&plan, &Location::Root, "quire");
        assert_eq!(lines.len(), 4);
        assert!(lines[..3].iter().all(|l| line_width(l) == 80));
        let row = text(&lines[1]);
        assert!(row.contains("quire /"));
        assert!(row.contains("p posts"));
    }

    #[test]
    fn test_header_truncates_long_title() {
        let plan = compute_layout(100, 30, &Location::Root);
        let long = "x".repeat(200);
        let row = text(&header_lines(&plan, &Location::List, &long)[1]);
        // Budget is 80 - 18 = 62: keep 58 columns plus the ellipsis.
        assert!(row.contains(&format!("{}...", "x".repeat(58))));
        assert!(!row.contains(&"x".repeat(59)));
        assert!(row.contains("b back"));
    }

    #[test]
    fn test_header_single_mode_drops_side_cell() {
        let plan = compute_layout(60, 30, &Location::List);
        let long = "y".repeat(200);
        let lines = header_lines(&plan, &Location::List, &long);
        let row = text(&lines[1]);
        // Content width 56, budget 50: keep 46 plus the ellipsis.
        assert!(row.contains(&format!("{}...", "y".repeat(46))));
        assert!(!row.contains("back"));
        assert_eq!(line_width(&lines[1]), 56);
    }

    #[test]
    fn test_footer_carries_hint_in_single_mode() {
        let detail = Location::Detail(DocumentPath::new("posts/a"));
        let wide = footer_lines(&compute_layout(100, 30, &detail), &detail);
        let narrow = footer_lines(&compute_layout(60, 30, &detail), &detail);
        assert_eq!(wide.len(), 4);
        assert!(!text(&wide[2]).contains("back"));
        assert!(text(&narrow[2]).contains("b back"));
        assert!(text(&wide[2]).contains("q quit"));
    }

    #[test]
    fn test_apply_sync_fills_region() {
        let mut frame = compose(vec![], vec![], vec![], 10, 12);
        let sync = SyncCommand {
            lines: vec![Line::from("one"), Line::from("two")],
            top: 4,
            bottom: 7,
            generation: 3,
        };
        frame.apply_sync(&sync);
        assert!(text(&frame.lines[4]).starts_with("one"));
        assert!(text(&frame.lines[5]).starts_with("two"));
        assert_eq!(text(&frame.lines[6]).trim(), "");
        assert_eq!(line_width(&frame.lines[5]), 10);
    }
}
