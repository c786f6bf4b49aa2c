//! Session event types.
//!
//! Every input a session reacts to is one of these; the loop feeds them to
//! `update()` one at a time.

use crossterm::event::KeyEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The terminal reported new dimensions.
    Resize { width: u16, height: u16 },
    /// A key press.
    Key(KeyEvent),
    /// The renderer applied the sync with this viewport generation.
    Synced(u64),
}
