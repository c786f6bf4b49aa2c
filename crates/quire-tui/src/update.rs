//! Session reducer.
//!
//! `update()` is the only place session state changes. It handles one event
//! completely (navigation, layout, page rebuild) and returns the effects the
//! loop must apply, in order, before drawing the next frame.
//!
//! In high-performance mode every viewport change is followed by a
//! `SessionEffect::Sync` taken after the change, never before it.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use quire_core::{Document, DocumentPath, DocumentSummary, StoreErrorKind};
use ratatui::text::Line;
use tracing::{debug, warn};

use crate::cache::{BlockKey, RenderError, RenderedBlock};
use crate::common::indent_line;
use crate::effects::SessionEffect;
use crate::events::SessionEvent;
use crate::layout::{BodyKind, HEADER_HEIGHT, MAX_CARDS, arrange_blocks, compute_layout};
use crate::state::{Location, SessionState};

/// Applies one event to the session.
///
/// # Errors
/// Returns `RenderError` when a page cannot be converted; the session must
/// end.
pub fn update(
    state: &mut SessionState,
    event: SessionEvent,
) -> Result<Vec<SessionEffect>, RenderError> {
    match event {
        SessionEvent::Resize { width, height } => handle_resize(state, width, height),
        SessionEvent::Key(key) => handle_key(state, key),
        SessionEvent::Synced(generation) => {
            state.acked_generation = state.acked_generation.max(generation);
            Ok(Vec::new())
        }
    }
}

// ============================================================================
// Resize
// ============================================================================

fn handle_resize(
    state: &mut SessionState,
    width: u16,
    height: u16,
) -> Result<Vec<SessionEffect>, RenderError> {
    state.width = width;
    state.height = height;

    let plan = compute_layout(width, height, &state.location);
    let width_changed = state
        .plan
        .is_some_and(|old| old.content_width != plan.content_width);
    state.plan = Some(plan);
    state.list.set_height(plan.viewport_height);

    if width_changed {
        debug!(content_width = plan.content_width, "content width changed");
    }
    if !state.loaded || width_changed {
        state.loaded = true;
        rebuild_page(state)?;
    }

    if plan.body != BodyKind::List {
        state.viewport.set_size(width, plan.viewport_height);
    }
    recenter(state);
    state.viewport.anchor(HEADER_HEIGHT);
    Ok(redraw_with_sync(state))
}

// ============================================================================
// Keys
// ============================================================================

fn handle_key(
    state: &mut SessionState,
    key: KeyEvent,
) -> Result<Vec<SessionEffect>, RenderError> {
    if key.kind != KeyEventKind::Press {
        return Ok(Vec::new());
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code == KeyCode::Char('q') || (ctrl && key.code == KeyCode::Char('c')) {
        state.should_quit = true;
        return Ok(vec![SessionEffect::Quit]);
    }

    match (&state.location, key.code) {
        (Location::Root, KeyCode::Char('p')) => enter_list(state),
        (Location::List, KeyCode::Enter) => {
            let Some(path) = state.list.selected_item().map(|item| item.path.clone()) else {
                return Ok(Vec::new());
            };
            enter_detail(state, path)
        }
        (Location::List | Location::Detail(_), KeyCode::Char('b')) => enter_root(state),
        (Location::List, _) => {
            if state.list.handle_key(key) {
                Ok(vec![SessionEffect::Redraw])
            } else {
                Ok(Vec::new())
            }
        }
        (Location::Root | Location::Detail(_), _) => {
            if state.viewport.handle_key(key) {
                Ok(redraw_with_sync(state))
            } else {
                Ok(Vec::new())
            }
        }
    }
}

// ============================================================================
// Transitions
// ============================================================================

fn set_location(state: &mut SessionState, location: Location) {
    debug!(from = ?state.location, to = ?location, "navigate");
    state.location = location;
    if state.loaded {
        state.plan = Some(compute_layout(state.width, state.height, &state.location));
    }
}

fn list_documents(state: &SessionState) -> Vec<DocumentSummary> {
    match state.store.list() {
        Ok(items) => items,
        Err(err) => {
            warn!(error = %err, "failed to list documents");
            Vec::new()
        }
    }
}

fn enter_list(state: &mut SessionState) -> Result<Vec<SessionEffect>, RenderError> {
    let items = list_documents(state);
    state.list.set_items(items);
    set_location(state, Location::List);
    state.page.clear();
    state.viewport.clear();
    Ok(redraw_with_sync(state))
}

fn enter_detail(
    state: &mut SessionState,
    path: DocumentPath,
) -> Result<Vec<SessionEffect>, RenderError> {
    match state.store.load(&path) {
        Ok(document) => {
            state.current = Some(document);
            set_location(state, Location::Detail(path));
            show_page(state)
        }
        Err(err) => {
            if err.kind == StoreErrorKind::NotFound {
                warn!(%path, "document not found, returning to root");
            } else {
                warn!(%path, error = %err, "failed to load document, returning to root");
            }
            enter_root(state)
        }
    }
}

fn enter_root(state: &mut SessionState) -> Result<Vec<SessionEffect>, RenderError> {
    state.current = None;
    set_location(state, Location::Root);
    show_page(state)
}

/// Rebuilds the page for the current location and scrolls to its top.
fn show_page(state: &mut SessionState) -> Result<Vec<SessionEffect>, RenderError> {
    if state.loaded {
        rebuild_page(state)?;
        if let Some(plan) = state.plan {
            state.viewport.set_size(state.width, plan.viewport_height);
        }
        recenter(state);
        state.viewport.goto_top();
        state.viewport.anchor(HEADER_HEIGHT);
    }
    Ok(redraw_with_sync(state))
}

fn redraw_with_sync(state: &SessionState) -> Vec<SessionEffect> {
    if state.high_performance() {
        vec![SessionEffect::Sync(state.viewport.sync()), SessionEffect::Redraw]
    } else {
        vec![SessionEffect::Redraw]
    }
}

// ============================================================================
// Page building
// ============================================================================

fn placeholder(path: DocumentPath, site_name: &str) -> Document {
    Document {
        path,
        title: site_name.to_string(),
        description: String::new(),
        body: format!("# {site_name}\n\nNothing here yet."),
    }
}

/// Body of the landing document, loaded on first use.
fn landing_body(state: &mut SessionState) -> String {
    if let Some(document) = &state.landing {
        return document.body.clone();
    }
    let path = DocumentPath::landing();
    let document = match state.store.load(&path) {
        Ok(document) => document,
        Err(err) => {
            warn!(error = %err, "landing document unavailable, using placeholder");
            placeholder(path, &state.options.site_name)
        }
    };
    let body = document.body.clone();
    state.landing = Some(document);
    body
}

fn card_text(summary: &DocumentSummary) -> String {
    if summary.description.is_empty() {
        format!("**{}**", summary.title)
    } else {
        format!("**{}**\n\n{}", summary.title, summary.description)
    }
}

fn lines_of(block: &RenderedBlock) -> impl Iterator<Item = Line<'static>> + '_ {
    block.lines.iter().cloned()
}

/// Renders the page for the current location at the current content width.
///
/// Goes through the cache, so rebuilding at an unchanged width never calls
/// the converter.
fn rebuild_page(state: &mut SessionState) -> Result<(), RenderError> {
    let Some(plan) = state.plan else {
        return Ok(());
    };
    let content_width = usize::from(plan.content_width);

    let page = match state.location.clone() {
        Location::Root => {
            let body = landing_body(state);
            let key = BlockKey::Document(DocumentPath::landing());
            let landing = state.cache.render(&key, &body, content_width)?;
            let mut page: Vec<Line<'static>> = lines_of(&landing).collect();

            if state.summaries.is_none() {
                state.summaries = Some(list_documents(state));
            }
            let summaries = state.summaries.clone().unwrap_or_default();
            let block_width = usize::from(plan.block_width());
            let cards = summaries
                .iter()
                .take(MAX_CARDS)
                .map(|summary| {
                    let key = BlockKey::Card(summary.path.clone());
                    state.cache.render(&key, &card_text(summary), block_width)
                })
                .collect::<Result<Vec<Arc<RenderedBlock>>, _>>()?;

            if !cards.is_empty() {
                page.push(Line::default());
                page.extend(arrange_blocks(&cards, &plan));
            }
            page
        }
        Location::Detail(path) => {
            let body = state
                .current
                .as_ref()
                .map(|doc| doc.body.clone())
                .unwrap_or_default();
            let key = BlockKey::Document(path);
            let block = state.cache.render(&key, &body, content_width)?;
            lines_of(&block).collect()
        }
        Location::List => Vec::new(),
    };

    debug!(location = ?state.location, lines = page.len(), "page rebuilt");
    state.page = page;
    Ok(())
}

/// Centres the page column in the terminal and hands it to the viewport.
fn recenter(state: &mut SessionState) {
    let Some(plan) = state.plan else {
        return;
    };
    if plan.body == BodyKind::List {
        return;
    }
    let margin = usize::from(state.width.saturating_sub(plan.content_width) / 2);
    let lines = state
        .page
        .iter()
        .cloned()
        .map(|line| indent_line(line, margin))
        .collect();
    state.viewport.set_content(lines);
}
