//! Pure view: session state to frame.
//!
//! Nothing here mutates state or performs I/O.

use ratatui::text::Line;

use crate::common::{Scrollbar, indent_line};
use crate::compose::{Frame, compose, footer_lines, header_lines};
use crate::layout::BodyKind;
use crate::state::SessionState;

/// Shifts content-width lines so the column sits centred in the terminal.
fn centered(lines: Vec<Line<'static>>, margin: usize) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .map(|line| indent_line(line, margin))
        .collect()
}

/// Builds the frame for the current state.
///
/// Before the first resize the frame is empty. In high-performance mode the
/// scrolling body is left to the renderer's synced region.
pub fn frame(state: &SessionState) -> Frame {
    let (width, height) = (state.width, state.height);
    let Some(plan) = state.plan else {
        return compose(Vec::new(), Vec::new(), Vec::new(), width, height);
    };

    let margin = usize::from(width.saturating_sub(plan.content_width) / 2);
    let header = centered(
        header_lines(&plan, &state.location, &state.options.site_name),
        margin,
    );
    let footer = centered(footer_lines(&plan, &state.location), margin);

    if plan.body == BodyKind::List {
        let body = centered(state.list.lines(plan.content_width), margin);
        return compose(header, body, footer, width, height);
    }

    let viewport = &state.viewport;
    let body = if state.high_performance() {
        Vec::new()
    } else {
        viewport.visible_lines().to_vec()
    };
    let mut frame = compose(header, body, footer, width, height);
    frame.synced_body = state.high_performance();
    frame.scrollbar = Scrollbar::for_content(
        viewport.content_height(),
        usize::from(viewport.height()),
        viewport.y_offset(),
    );
    frame
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyCode;

    use super::*;
    use crate::state::SessionOptions;
    use crate::testing::{CountingConverter, MockStore, key, resize};
    use crate::update::update;

    fn state(store: MockStore, high_performance: bool) -> SessionState {
        SessionState::new(
            Arc::new(store),
            Arc::new(CountingConverter::default()),
            SessionOptions {
                site_name: "quire".to_string(),
                high_performance,
            },
        )
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_frame_before_first_resize_is_empty() {
        let state = state(MockStore::with_posts(1), true);
        let frame = frame(&state);
        assert!(frame.lines.is_empty());
    }

    #[test]
    fn test_frame_has_exact_dimensions() {
        let mut state = state(MockStore::with_posts(4), false);
        update(&mut state, resize(100, 30)).unwrap();
        let frame = frame(&state);
        assert_eq!(frame.lines.len(), 30);
        assert!(frame.lines.iter().all(|l| crate::common::line_width(l) == 100));
    }

    #[test]
    fn test_header_is_centered() {
        let mut state = state(MockStore::with_posts(0), false);
        update(&mut state, resize(100, 30)).unwrap();
        let frame = frame(&state);
        // (100 - 80) / 2 columns of margin.
        assert!(text(&frame.lines[0]).starts_with(&format!("{}╭", " ".repeat(10))));
    }

    #[test]
    fn test_body_comes_from_viewport_without_high_performance() {
        let mut state = state(MockStore::with_posts(0), false);
        update(&mut state, resize(100, 30)).unwrap();
        let frame = frame(&state);
        assert!(!frame.synced_body);
        assert!(text(&frame.lines[4]).contains("# Welcome"));
    }

    #[test]
    fn test_high_performance_leaves_body_to_sync() {
        let mut state = state(MockStore::with_posts(0), true);
        let effects = update(&mut state, resize(100, 30)).unwrap();
        let mut frame = frame(&state);
        assert!(frame.synced_body);
        assert_eq!(text(&frame.lines[4]).trim(), "");

        let crate::effects::SessionEffect::Sync(sync) = &effects[0] else {
            panic!("expected sync");
        };
        frame.apply_sync(sync);
        assert!(text(&frame.lines[4]).contains("# Welcome"));
    }

    #[test]
    fn test_list_body() {
        let mut state = state(MockStore::with_posts(3), true);
        update(&mut state, resize(100, 30)).unwrap();
        update(&mut state, key(KeyCode::Char('p'))).unwrap();
        let frame = frame(&state);
        assert!(!frame.synced_body);
        assert!(text(&frame.lines[4]).contains("Recent Posts"));
        assert!(frame.lines.iter().any(|l| text(l).contains("Post 2")));
    }

    #[test]
    fn test_scrollbar_only_when_overflowing() {
        let mut short = state(MockStore::with_posts(0), true);
        update(&mut short, resize(100, 30)).unwrap();
        assert!(frame(&short).scrollbar.is_none());

        let mut long = state(MockStore::with_long_landing(100), true);
        update(&mut long, resize(100, 30)).unwrap();
        assert!(frame(&long).scrollbar.is_some());
    }
}
