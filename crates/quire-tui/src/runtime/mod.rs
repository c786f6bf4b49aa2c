//! Session runtimes.
//!
//! All side effects happen here: the reducer stays pure and returns effects,
//! the driver applies them to a `SessionRenderer`. This module also hosts
//! the local terminal loop used by `quire browse`.

mod driver;
mod renderer;

use std::io::{Stdout, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::terminal::size as terminal_size;
pub use driver::{Flow, SessionDriver};
use quire_core::ContentStore;
pub use renderer::SessionRenderer;
use tracing::{debug, info};

use crate::cache::MarkdownConverter;
use crate::events::SessionEvent;
use crate::state::{SessionOptions, SessionState};
use crate::terminal;

/// How long the local loop waits for input before polling again.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Maps a crossterm event to a session event; mouse, focus and paste input
/// are ignored.
pub fn session_event(event: Event) -> Option<SessionEvent> {
    match event {
        Event::Key(key) => Some(SessionEvent::Key(key)),
        Event::Resize(width, height) => Some(SessionEvent::Resize { width, height }),
        _ => None,
    }
}

/// Browses the site on the local terminal until the user quits.
///
/// # Errors
/// Returns an error if the terminal cannot be set up or a page fails to
/// render.
pub fn run_local(
    store: Arc<dyn ContentStore>,
    converter: Arc<dyn MarkdownConverter>,
    options: SessionOptions,
) -> Result<()> {
    terminal::install_panic_hook();
    let stdout = terminal::setup_terminal().context("Failed to setup terminal")?;

    let result = run_session(stdout, store, converter, options);

    terminal::restore_terminal()?;
    info!("local session ended");
    result
}

fn run_session(
    stdout: Stdout,
    store: Arc<dyn ContentStore>,
    converter: Arc<dyn MarkdownConverter>,
    options: SessionOptions,
) -> Result<()> {
    let (width, height) = terminal_size().context("Failed to read terminal size")?;
    let renderer = SessionRenderer::new(stdout, width, height)?;
    let state = SessionState::new(store, converter, options);
    let mut driver = SessionDriver::new(state, renderer);
    info!(width, height, "local session started");
    event_loop(&mut driver, width, height)
}

fn event_loop<W: Write>(
    driver: &mut SessionDriver<W>,
    width: u16,
    height: u16,
) -> Result<()> {
    if driver.dispatch(SessionEvent::Resize { width, height })? == Flow::Quit {
        return Ok(());
    }
    loop {
        if !event::poll(POLL_INTERVAL).context("Failed to poll terminal events")? {
            continue;
        }
        let Some(event) = session_event(event::read().context("Failed to read terminal event")?)
        else {
            continue;
        };
        debug!(?event, "terminal event");
        if driver.dispatch(event)? == Flow::Quit {
            return Ok(());
        }
    }
}
