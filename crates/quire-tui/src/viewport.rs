//! Scrollable body viewport.
//!
//! The viewport owns the page lines shown between header and footer and the
//! scroll offset into them. Every change bumps a generation counter; in
//! high-performance mode the reducer follows each change with a
//! `SyncCommand` snapshot, which the renderer draws into the scroll region.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;

/// Snapshot of the visible window pushed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncCommand {
    /// Lines to draw, at most `bottom - top` of them.
    pub lines: Vec<Line<'static>>,
    /// First screen row of the scroll region.
    pub top: u16,
    /// One past the last screen row of the scroll region.
    pub bottom: u16,
    /// Viewport generation the snapshot was taken at.
    pub generation: u64,
}

impl SyncCommand {
    pub fn height(&self) -> u16 {
        self.bottom.saturating_sub(self.top)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Viewport {
    content: Vec<Line<'static>>,
    y_offset: usize,
    width: u16,
    height: u16,
    /// Screen row the viewport starts at.
    y_position: u16,
    high_performance: bool,
    generation: u64,
}

impl Viewport {
    pub fn new(high_performance: bool) -> Self {
        Self {
            high_performance,
            ..Self::default()
        }
    }

    pub fn high_performance(&self) -> bool {
        self.high_performance
    }

    pub fn y_offset(&self) -> usize {
        self.y_offset
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn y_position(&self) -> u16 {
        self.y_position
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn content_height(&self) -> usize {
        self.content.len()
    }

    pub fn max_offset(&self) -> usize {
        self.content
            .len()
            .saturating_sub(usize::from(self.height))
    }

    fn bump(&mut self) {
        self.generation += 1;
    }

    fn clamp(&mut self) {
        self.y_offset = self.y_offset.min(self.max_offset());
    }

    /// Replaces the page, keeping the offset where it still fits.
    pub fn set_content(&mut self, lines: Vec<Line<'static>>) {
        self.content = lines;
        self.clamp();
        self.bump();
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp();
        self.bump();
    }

    /// Collapses the viewport to 0x0 with no content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.width = 0;
        self.height = 0;
        self.y_offset = 0;
        self.bump();
    }

    /// Moves the viewport to start at screen row `y_position`.
    pub fn anchor(&mut self, y_position: u16) {
        self.y_position = y_position;
        self.bump();
    }

    /// Scrolls by `delta` lines. Returns whether the offset moved.
    pub fn scroll(&mut self, delta: isize) -> bool {
        let target = self
            .y_offset
            .saturating_add_signed(delta)
            .min(self.max_offset());
        self.move_to(target)
    }

    pub fn goto_top(&mut self) -> bool {
        self.move_to(0)
    }

    pub fn goto_bottom(&mut self) -> bool {
        self.move_to(self.max_offset())
    }

    fn move_to(&mut self, offset: usize) -> bool {
        if offset == self.y_offset {
            return false;
        }
        self.y_offset = offset;
        self.bump();
        true
    }

    pub fn visible_lines(&self) -> &[Line<'static>] {
        let start = self.y_offset.min(self.content.len());
        let end = (start + usize::from(self.height)).min(self.content.len());
        &self.content[start..end]
    }

    /// Snapshot of the current window.
    pub fn sync(&self) -> SyncCommand {
        SyncCommand {
            lines: self.visible_lines().to_vec(),
            top: self.y_position,
            bottom: self.y_position.saturating_add(self.height),
            generation: self.generation,
        }
    }

    /// Applies a scrolling key. Returns whether the offset moved.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let page = self.height.max(1) as isize;
        let half = (page / 2).max(1);
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll(1),
            KeyCode::Char('u') if ctrl => self.scroll(-half),
            KeyCode::Char('d') if ctrl => self.scroll(half),
            KeyCode::PageUp => self.scroll(-page),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll(page),
            KeyCode::Home | KeyCode::Char('g') => self.goto_top(),
            KeyCode::End | KeyCode::Char('G') => self.goto_bottom(),
            _ => false,
        }
    }
}
