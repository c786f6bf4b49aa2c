//! Terminal document browser sessions for quire.
//!
//! One `SessionState` per viewer, advanced by `update()` and drawn by
//! `render::frame()`. The runtime applies effects to a per-session
//! renderer; the same pieces serve the local terminal and remote sessions.

pub mod cache;
pub mod common;
pub mod compose;
pub mod effects;
pub mod events;
pub mod layout;
pub mod list;
pub mod markdown;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod theme;
pub mod update;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use cache::{MarkdownConverter, RenderCache, RenderError};
pub use events::SessionEvent;
pub use markdown::PulldownConverter;
pub use runtime::{Flow, SessionDriver, SessionRenderer, run_local};
pub use state::{Location, SessionOptions, SessionState};
