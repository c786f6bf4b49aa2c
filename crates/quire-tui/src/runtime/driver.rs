//! Applies reducer effects to a session's renderer.
//!
//! Shared by the local terminal loop and remote sessions: both feed events in
//! one at a time and only differ in where input comes from and where the
//! renderer's bytes go.

use std::collections::VecDeque;
use std::io::Write;

use anyhow::Result;

use crate::effects::SessionEffect;
use crate::events::SessionEvent;
use crate::render;
use crate::runtime::renderer::SessionRenderer;
use crate::state::SessionState;
use crate::update::update;

/// What the loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct SessionDriver<W: Write> {
    state: SessionState,
    renderer: SessionRenderer<W>,
}

impl<W: Write> SessionDriver<W> {
    pub fn new(state: SessionState, renderer: SessionRenderer<W>) -> Self {
        Self { state, renderer }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn renderer_mut(&mut self) -> &mut SessionRenderer<W> {
        &mut self.renderer
    }

    /// Runs one event through the reducer and applies its effects in order.
    ///
    /// Sync acknowledgements are fed back before the call returns.
    ///
    /// # Errors
    /// Returns an error if rendering fails or the renderer cannot write.
    pub fn dispatch(&mut self, event: SessionEvent) -> Result<Flow> {
        if let SessionEvent::Resize { width, height } = event {
            self.renderer.resize(width, height)?;
        }

        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for effect in update(&mut self.state, event)? {
                match effect {
                    SessionEffect::Sync(command) => {
                        let generation = self.renderer.sync(command);
                        pending.push_back(SessionEvent::Synced(generation));
                    }
                    SessionEffect::Redraw => {
                        self.renderer.draw(&render::frame(&self.state))?;
                    }
                    SessionEffect::Quit => return Ok(Flow::Quit),
                }
            }
        }
        Ok(Flow::Continue)
    }
}
