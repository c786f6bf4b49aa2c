//! Core building blocks for quire: the content store, configuration and logging.
//!
//! Nothing in here knows about terminals. The TUI and server crates depend on
//! this crate for the documents they display and the settings they run with.

pub mod config;
pub mod logging;
pub mod store;

pub use config::Config;
pub use store::{
    ContentStore, Document, DocumentPath, DocumentSummary, FsContentStore, StoreError,
    StoreErrorKind,
};
