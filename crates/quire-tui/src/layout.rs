//! Layout engine: terminal size to content geometry.

use std::sync::Arc;

use ratatui::text::{Line, Span};

use crate::cache::RenderedBlock;
use crate::common::fit_line;
use crate::state::Location;

/// Widest the content column ever gets.
pub const MAX_WIDTH: u16 = 80;
pub const HEADER_HEIGHT: u16 = 4;
pub const FOOTER_HEIGHT: u16 = 4;
/// Columns given up on each narrow terminal so text does not touch the edges.
pub const NARROW_MARGIN: u16 = 4;
/// Columns between the two blocks of a dual-column row.
pub const COLUMN_GAP: u16 = 2;
/// Preview cards shown on the landing view.
pub const MAX_CARDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMode {
    Single,
    Dual,
}

impl ColumnMode {
    pub fn for_width(fitted_width: u16) -> Self {
        if fitted_width < MAX_WIDTH {
            ColumnMode::Single
        } else {
            ColumnMode::Dual
        }
    }
}

/// What fills the body between header and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Landing document followed by preview cards.
    Blocks,
    /// Selectable document list.
    List,
    /// A single document.
    Document,
}

impl BodyKind {
    fn for_location(location: &Location) -> Self {
        match location {
            Location::Root => BodyKind::Blocks,
            Location::List => BodyKind::List,
            Location::Detail(_) => BodyKind::Document,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPlan {
    pub content_width: u16,
    pub viewport_height: u16,
    pub column_mode: ColumnMode,
    pub body: BodyKind,
}

impl LayoutPlan {
    /// Wrap width of one fixed block.
    pub fn block_width(&self) -> u16 {
        match self.column_mode {
            ColumnMode::Single => self.content_width,
            ColumnMode::Dual => (self.content_width.saturating_sub(COLUMN_GAP) / 2).max(1),
        }
    }
}

/// Computes the layout for a terminal of `width` x `height` cells.
///
/// Pure: identical inputs always give identical plans.
pub fn compute_layout(width: u16, height: u16, location: &Location) -> LayoutPlan {
    let fit = width.min(MAX_WIDTH);
    let content_width = if fit < MAX_WIDTH {
        fit.saturating_sub(NARROW_MARGIN).max(1)
    } else {
        fit
    };

    LayoutPlan {
        content_width,
        viewport_height: height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT),
        column_mode: ColumnMode::for_width(fit),
        body: BodyKind::for_location(location),
    }
}

/// Arranges fixed blocks into body lines.
///
/// In dual mode blocks pair into rows as tall as their taller member, with
/// `COLUMN_GAP` columns between them; an odd last block sits in the left
/// column. In single mode blocks stack. Rows and stacked blocks are separated
/// by one blank line.
pub fn arrange_blocks(blocks: &[Arc<RenderedBlock>], plan: &LayoutPlan) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match plan.column_mode {
        ColumnMode::Single => {
            for (i, block) in blocks.iter().enumerate() {
                if i > 0 {
                    lines.push(Line::default());
                }
                lines.extend(block.lines.iter().cloned());
            }
        }
        ColumnMode::Dual => {
            let cell = usize::from(plan.block_width());
            let gap = " ".repeat(usize::from(COLUMN_GAP));
            for (i, row) in blocks.chunks(2).enumerate() {
                if i > 0 {
                    lines.push(Line::default());
                }
                let left = &row[0];
                let right = row.get(1);
                let height = left.height().max(right.map_or(0, |b| b.height()));
                for y in 0..height {
                    let left_line = left.lines.get(y).cloned().unwrap_or_default();
                    let mut spans = fit_line(left_line, cell).spans;
                    if let Some(right) = right {
                        spans.push(Span::raw(gap.clone()));
                        let right_line = right.lines.get(y).cloned().unwrap_or_default();
                        spans.extend(fit_line(right_line, cell).spans);
                    }
                    lines.push(Line::from(spans));
                }
            }
        }
    }
    lines
}
