//! Per-session state.
//!
//! ```text
//! SessionState
//! ├── location: Location          (Root | List | Detail(path))
//! ├── plan: Option<LayoutPlan>    (None until the first resize)
//! ├── viewport: Viewport          (scrollable body for Root / Detail)
//! ├── list: DocumentList          (body for List)
//! ├── cache: RenderCache          (converted blocks by key and width)
//! └── landing / current / summaries / page
//! ```
//!
//! A session owns its state exclusively; only `update()` mutates it.

use std::fmt;
use std::sync::Arc;

use quire_core::{ContentStore, Document, DocumentPath, DocumentSummary};
use ratatui::text::Line;

use crate::cache::{MarkdownConverter, RenderCache};
use crate::layout::LayoutPlan;
use crate::list::DocumentList;
use crate::viewport::Viewport;

/// Where the session is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Landing document with preview cards.
    Root,
    /// Document list.
    List,
    /// One document, reached from the list.
    Detail(DocumentPath),
}

impl Location {
    /// Path shown in the header.
    pub fn display_path(&self) -> String {
        match self {
            Location::Root => "/".to_string(),
            Location::List => "/posts".to_string(),
            Location::Detail(path) => format!("/{path}"),
        }
    }
}

/// Per-session settings taken from the server configuration.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub site_name: String,
    pub high_performance: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            site_name: "quire".to_string(),
            high_performance: true,
        }
    }
}

pub struct SessionState {
    pub options: SessionOptions,
    pub store: Arc<dyn ContentStore>,
    pub location: Location,
    pub width: u16,
    pub height: u16,
    pub plan: Option<LayoutPlan>,
    /// Set once the first dimensions arrived and a page was built.
    pub loaded: bool,
    pub viewport: Viewport,
    pub list: DocumentList,
    pub cache: RenderCache,
    /// Landing document, loaded on the first visit to `Root`.
    pub landing: Option<Document>,
    /// Document shown in `Detail`; dropped when leaving it.
    pub current: Option<Document>,
    /// Summaries used for the landing view's preview cards.
    pub summaries: Option<Vec<DocumentSummary>>,
    /// Page lines at content width, before centring in the terminal.
    pub page: Vec<Line<'static>>,
    pub should_quit: bool,
    /// Highest viewport generation the renderer acknowledged.
    pub acked_generation: u64,
}

impl SessionState {
    pub fn new(
        store: Arc<dyn ContentStore>,
        converter: Arc<dyn MarkdownConverter>,
        options: SessionOptions,
    ) -> Self {
        Self {
            viewport: Viewport::new(options.high_performance),
            options,
            store,
            location: Location::Root,
            width: 0,
            height: 0,
            plan: None,
            loaded: false,
            list: DocumentList::default(),
            cache: RenderCache::new(converter),
            landing: None,
            current: None,
            summaries: None,
            page: Vec::new(),
            should_quit: false,
            acked_generation: 0,
        }
    }

    pub fn high_performance(&self) -> bool {
        self.options.high_performance
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("location", &self.location)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("plan", &self.plan)
            .field("loaded", &self.loaded)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path() {
        assert_eq!(Location::Root.display_path(), "/");
        assert_eq!(Location::List.display_path(), "/posts");
        assert_eq!(
            Location::Detail(DocumentPath::new("posts/hello")).display_path(),
            "/posts/hello"
        );
    }
}
