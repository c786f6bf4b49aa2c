//! Remote terminal access to a quire site.
//!
//! A plain TCP listener speaking just enough telnet to get character input
//! and window sizes from the client. Every connection runs an independent
//! session task; the content store is the only thing they share.

pub mod listener;
pub mod session;
pub mod telnet;

pub use listener::{Server, shutdown_signal};
pub use session::{SessionEnd, SiteContext, run_session};
