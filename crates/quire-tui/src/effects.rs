//! Session effect types.
//!
//! Effects are commands returned by the reducer for the session loop to
//! execute, in order, before the next frame is drawn. The reducer itself
//! never touches the renderer or the connection.

use crate::viewport::SyncCommand;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Push the visible body window to the renderer's scroll region.
    ///
    /// Always emitted after the viewport change it describes.
    Sync(SyncCommand),
    /// Draw a fresh frame.
    Redraw,
    /// End the session.
    Quit,
}
