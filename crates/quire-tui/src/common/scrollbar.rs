//! Body scrollbar with a stable thumb length.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use crate::theme::{self, Style};

const THUMB: &str = "┃";
const TRACK: &str = "│";

/// Scroll position indicator drawn in the rightmost column of its area.
///
/// The thumb length depends only on the content and viewport sizes, so it
/// does not change size while scrolling, and it touches the bottom of the
/// track exactly at the maximum offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scrollbar {
    content_height: usize,
    viewport_height: usize,
    offset: usize,
}

impl Scrollbar {
    /// Returns a scrollbar only when the content overflows the viewport.
    pub fn for_content(content_height: usize, viewport_height: usize, offset: usize) -> Option<Self> {
        (viewport_height > 0 && content_height > viewport_height).then_some(Self {
            content_height,
            viewport_height,
            offset,
        })
    }

    fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Thumb start and length for a track of `track` rows.
    pub fn thumb(&self, track: usize) -> (usize, usize) {
        if track == 0 {
            return (0, 0);
        }
        let visible = self.viewport_height.min(track) as u64;
        let total = self.content_height.max(1) as u64;
        let len = ((track as u64 * visible + total / 2) / total).clamp(1, track as u64) as usize;

        let max_offset = self.max_offset().max(1) as u64;
        let room = (track - len) as u64;
        let start = (self.offset.min(self.max_offset()) as u64 * room / max_offset) as usize;
        (start, len)
    }
}

impl Widget for Scrollbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 {
            return;
        }
        let (start, len) = self.thumb(usize::from(area.height));
        let x = area.right() - 1;
        for (row, y) in (area.top()..area.bottom()).enumerate() {
            let (symbol, style) = if row >= start && row < start + len {
                (THUMB, Style::Subtle)
            } else {
                (TRACK, Style::Muted)
            };
            buf.set_string(x, y, symbol, theme::style(style));
        }
    }
}
