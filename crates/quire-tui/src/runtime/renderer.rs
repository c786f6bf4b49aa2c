//! Per-session terminal renderer.
//!
//! Wraps a ratatui `Terminal` with a fixed viewport over any writer: stdout
//! for local browsing, an in-memory buffer for remote sessions. ratatui's
//! double buffer diffs each frame against the previous one, so only changed
//! cells are written.

use std::io::Write;

use anyhow::{Context, Result};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::{Terminal, TerminalOptions, Viewport as TerminalViewport};

use crate::compose::Frame;
use crate::viewport::SyncCommand;

pub struct SessionRenderer<W: Write> {
    terminal: Terminal<CrosstermBackend<W>>,
    /// Last scroll-region snapshot, drawn into frames with a synced body.
    synced: Option<SyncCommand>,
}

impl<W: Write> SessionRenderer<W> {
    /// Creates a renderer for a `width` x `height` screen.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be created.
    pub fn new(writer: W, width: u16, height: u16) -> Result<Self> {
        let terminal = Terminal::with_options(
            CrosstermBackend::new(writer),
            TerminalOptions {
                viewport: TerminalViewport::Fixed(Rect::new(0, 0, width, height)),
            },
        )
        .context("Failed to create terminal")?;
        Ok(Self {
            terminal,
            synced: None,
        })
    }

    /// Adopts new screen dimensions; the next draw repaints everything.
    ///
    /// # Errors
    /// Returns an error if the screen cannot be cleared.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.terminal
            .resize(Rect::new(0, 0, width, height))
            .context("Failed to resize terminal")
    }

    /// Stores a scroll-region snapshot and returns its generation for the
    /// acknowledgement event.
    pub fn sync(&mut self, command: SyncCommand) -> u64 {
        let generation = command.generation;
        self.synced = Some(command);
        generation
    }

    /// Draws a frame, filling a synced body from the last snapshot.
    ///
    /// # Errors
    /// Returns an error if writing to the backend fails.
    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let mut frame = frame.clone();
        if frame.synced_body
            && let Some(sync) = &self.synced
        {
            frame.apply_sync(sync);
        }
        self.terminal
            .draw(|f| f.render_widget(&frame, f.area()))
            .context("Failed to draw frame")?;
        Ok(())
    }

    pub fn writer_mut(&mut self) -> &mut W {
        self.terminal.backend_mut().writer_mut()
    }
}

impl SessionRenderer<Vec<u8>> {
    /// Takes the bytes written since the last call.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(self.writer_mut())
    }
}

#[cfg(test)]
mod tests {
    use ratatui::text::Line;

    use super::*;
    use crate::compose::compose;

    fn frame(body: &str, synced: bool) -> Frame {
        let mut frame = compose(
            vec![Line::from("head")],
            vec![Line::from(body.to_string())],
            vec![Line::from("foot")],
            20,
            10,
        );
        frame.synced_body = synced;
        frame
    }

    #[test]
    fn test_draw_writes_bytes() {
        let mut renderer = SessionRenderer::new(Vec::new(), 20, 10).unwrap();
        renderer.draw(&frame("hello", false)).unwrap();
        let out = renderer.take_output();
        assert!(String::from_utf8_lossy(&out).contains("hello"));
        assert!(renderer.take_output().is_empty());
    }

    #[test]
    fn test_identical_frame_writes_almost_nothing() {
        let mut renderer = SessionRenderer::new(Vec::new(), 20, 10).unwrap();
        renderer.draw(&frame("hello", false)).unwrap();
        let first = renderer.take_output().len();
        renderer.draw(&frame("hello", false)).unwrap();
        let second = renderer.take_output();
        assert!(second.len() < first);
        assert!(!String::from_utf8_lossy(&second).contains("hello"));
    }

    #[test]
    fn test_synced_body_uses_last_snapshot() {
        let mut renderer = SessionRenderer::new(Vec::new(), 20, 10).unwrap();
        let generation = renderer.sync(SyncCommand {
            lines: vec![Line::from("synced")],
            top: 4,
            bottom: 6,
            generation: 9,
        });
        assert_eq!(generation, 9);
        renderer.draw(&frame("ignored", true)).unwrap();
        let out = String::from_utf8_lossy(&renderer.take_output()).to_string();
        assert!(out.contains("synced"));
        assert!(!out.contains("ignored"));
    }

    #[test]
    fn test_resize_repaints() {
        let mut renderer = SessionRenderer::new(Vec::new(), 20, 10).unwrap();
        renderer.draw(&frame("hello", false)).unwrap();
        renderer.take_output();
        renderer.resize(20, 10).unwrap();
        renderer.draw(&frame("hello", false)).unwrap();
        assert!(String::from_utf8_lossy(&renderer.take_output()).contains("hello"));
    }
}
