//! Selectable document list shown in the `List` location.

use crossterm::event::{KeyCode, KeyEvent};
use quire_core::DocumentSummary;
use ratatui::text::Line;

use crate::common::{fit_line, truncate_header};
use crate::theme::{Style, span};

const TITLE: &str = "Recent Posts";
/// Rows above the first item: title and a blank line.
const TITLE_ROWS: usize = 2;
/// Rows per item: title, description, spacer.
const ITEM_ROWS: usize = 3;
const MARKER: &str = "│ ";
const NO_MARKER: &str = "  ";
const MARKER_WIDTH: usize = 2;

/// List of document summaries with a selection that is always visible.
#[derive(Debug, Clone, Default)]
pub struct DocumentList {
    items: Vec<DocumentSummary>,
    selected: usize,
    /// Index of the first item on screen.
    offset: usize,
    height: u16,
}

impl DocumentList {
    pub fn set_items(&mut self, items: Vec<DocumentSummary>) {
        self.items = items;
        self.selected = 0;
        self.offset = 0;
    }

    pub fn items(&self) -> &[DocumentSummary] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&DocumentSummary> {
        self.items.get(self.selected)
    }

    pub fn set_height(&mut self, height: u16) {
        self.height = height;
        self.reveal();
    }

    /// Items that fit in the current height, at least one.
    fn per_page(&self) -> usize {
        (usize::from(self.height).saturating_sub(TITLE_ROWS) / ITEM_ROWS).max(1)
    }

    fn reveal(&mut self) {
        let per_page = self.per_page();
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + per_page {
            self.offset = self.selected + 1 - per_page;
        }
    }

    pub fn select(&mut self, index: usize) -> bool {
        let index = index.min(self.items.len().saturating_sub(1));
        if index == self.selected {
            return false;
        }
        self.selected = index;
        self.reveal();
        true
    }

    /// Moves the selection. Returns whether it changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let page = self.per_page();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected + 1),
            KeyCode::PageUp => self.select(self.selected.saturating_sub(page)),
            KeyCode::PageDown => self.select(self.selected + page),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(usize::MAX),
            _ => false,
        }
    }

    /// Lines for the visible part of the list, each `width` columns wide.
    pub fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = usize::from(width);
        let text_width = width.saturating_sub(MARKER_WIDTH);
        let mut lines = Vec::new();

        let count = match self.items.len() {
            1 => "1 item".to_string(),
            n => format!("{n} items"),
        };
        lines.push(fit_line(
            Line::from(vec![
                span(TITLE, Style::H2),
                span("  ", Style::Plain),
                span(count, Style::Subtle),
            ]),
            width,
        ));
        lines.push(Line::default());

        if self.items.is_empty() {
            lines.push(Line::from(span("Nothing here yet.", Style::Subtle)));
            return lines;
        }

        let visible = self.items.iter().enumerate().skip(self.offset).take(self.per_page());
        for (i, item) in visible {
            let selected = i == self.selected;
            let (marker, title_style) = if selected {
                (span(MARKER, Style::Highlight), Style::Highlight)
            } else {
                (span(NO_MARKER, Style::Plain), Style::Normal)
            };
            lines.push(Line::from(vec![
                marker.clone(),
                span(truncate_header(&item.title, text_width), title_style),
            ]));
            lines.push(Line::from(vec![
                marker,
                span(truncate_header(&item.description, text_width), Style::Subtle),
            ]));
            lines.push(Line::default());
        }
        lines.pop();
        lines
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use quire_core::DocumentPath;

    use super::*;

    fn summaries(n: usize) -> Vec<DocumentSummary> {
        (0..n)
            .map(|i| DocumentSummary {
                path: DocumentPath::new(format!("posts/{i}")),
                title: format!("Title {i}"),
                description: format!("About {i}"),
            })
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_selection_clamps_to_items() {
        let mut list = DocumentList::default();
        list.set_items(summaries(3));
        assert!(!list.handle_key(key(KeyCode::Up)));
        list.handle_key(key(KeyCode::End));
        assert_eq!(list.selected(), 2);
        assert!(!list.handle_key(key(KeyCode::Down)));
    }

    #[test]
    fn test_lines_show_title_and_description() {
        let mut list = DocumentList::default();
        list.set_items(summaries(3));
        list.set_height(20);
        let lines = list.lines(40);
        let texts: Vec<_> = lines.iter().map(text).collect();
        assert!(texts[0].starts_with("Recent Posts  3 items"));
        assert_eq!(texts[2], "│ Title 0");
        assert_eq!(texts[3], "│ About 0");
        assert_eq!(texts[5], "  Title 1");
        assert_eq!(lines.len(), 2 + 3 * 3 - 1);
    }

    #[test]
    fn test_selection_stays_visible() {
        let mut list = DocumentList::default();
        list.set_items(summaries(10));
        // Room for two items.
        list.set_height(8);
        for _ in 0..5 {
            list.handle_key(key(KeyCode::Down));
        }
        let texts: Vec<_> = list.lines(40).iter().map(text).collect();
        assert!(texts.contains(&"│ Title 5".to_string()));
        assert!(!texts.iter().any(|t| t.contains("Title 0")));

        list.handle_key(key(KeyCode::Home));
        let texts: Vec<_> = list.lines(40).iter().map(text).collect();
        assert!(texts.contains(&"│ Title 0".to_string()));
    }

    #[test]
    fn test_empty_list_placeholder() {
        let list = DocumentList::default();
        let texts: Vec<_> = list.lines(40).iter().map(text).collect();
        assert!(texts[0].contains("0 items"));
        assert_eq!(texts[2], "Nothing here yet.");
        assert!(list.selected_item().is_none());
    }
}
