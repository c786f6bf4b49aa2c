//! Test doubles shared by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quire_core::{
    ContentStore, Document, DocumentPath, DocumentSummary, StoreError, StoreErrorKind,
};
use ratatui::text::Line;

use crate::cache::{MarkdownConverter, RenderError};
use crate::common::truncate_to_width;
use crate::events::SessionEvent;

pub fn key(code: KeyCode) -> SessionEvent {
    SessionEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn resize(width: u16, height: u16) -> SessionEvent {
    SessionEvent::Resize { width, height }
}

/// In-memory store that records every `load`.
#[derive(Debug, Default)]
pub struct MockStore {
    landing: Option<Document>,
    posts: Vec<Document>,
    hidden: HashSet<String>,
    list_fails: bool,
    loads: Mutex<Vec<DocumentPath>>,
}

impl MockStore {
    /// A landing document plus `n` posts named `posts/post-<i>`.
    pub fn with_posts(n: usize) -> Self {
        let posts = (0..n)
            .map(|i| Document {
                path: DocumentPath::new(format!("posts/post-{i}")),
                title: format!("Post {i}"),
                description: format!("About post {i}"),
                body: format!("# Post {i}\n\nBody of post {i}."),
            })
            .collect();
        Self {
            landing: Some(Document {
                path: DocumentPath::landing(),
                title: "root".to_string(),
                description: String::new(),
                body: "# Welcome\n\nHello there.".to_string(),
            }),
            posts,
            ..Self::default()
        }
    }

    /// A landing document `lines` lines long and no posts.
    pub fn with_long_landing(lines: usize) -> Self {
        let mut store = Self::with_posts(0);
        if let Some(landing) = &mut store.landing {
            landing.body = (0..lines)
                .map(|i| format!("line {i}"))
                .collect::<Vec<_>>()
                .join("\n");
        }
        store
    }

    /// Makes `load(path)` report `NotFound` while keeping it listed.
    pub fn hide(&mut self, path: &str) {
        self.hidden.insert(path.to_string());
    }

    pub fn fail_list(&mut self) {
        self.list_fails = true;
    }

    pub fn loads(&self) -> usize {
        self.loads.lock().map(|loads| loads.len()).unwrap_or_default()
    }

    pub fn load_count(&self, path: &DocumentPath) -> usize {
        self.loads
            .lock()
            .map(|loads| loads.iter().filter(|p| *p == path).count())
            .unwrap_or_default()
    }
}

impl ContentStore for MockStore {
    fn list(&self) -> Result<Vec<DocumentSummary>, StoreError> {
        if self.list_fails {
            return Err(StoreError::new(StoreErrorKind::Io, "posts", "unreadable"));
        }
        Ok(self.posts.iter().map(Document::summary).collect())
    }

    fn load(&self, path: &DocumentPath) -> Result<Document, StoreError> {
        if let Ok(mut loads) = self.loads.lock() {
            loads.push(path.clone());
        }
        if self.hidden.contains(path.as_str()) {
            return Err(StoreError::not_found(path.as_str()));
        }
        self.landing
            .iter()
            .chain(&self.posts)
            .find(|doc| &doc.path == path)
            .cloned()
            .ok_or_else(|| StoreError::not_found(path.as_str()))
    }
}

/// Converter that emits each source line as-is (cut to width) and counts
/// calls.
#[derive(Debug, Default)]
pub struct CountingConverter {
    calls: AtomicUsize,
    padding: usize,
}

impl CountingConverter {
    /// Surrounds every conversion with `padding` blank lines on each side.
    pub fn with_padding(padding: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            padding,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MarkdownConverter for CountingConverter {
    fn convert(&self, text: &str, width: usize) -> Result<Vec<Line<'static>>, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let blank = std::iter::repeat_with(Line::default).take(self.padding);
        Ok(blank
            .clone()
            .chain(text.lines().map(|line| Line::from(truncate_to_width(line, width))))
            .chain(blank)
            .collect())
    }
}

/// Converter that always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingConverter;

impl MarkdownConverter for FailingConverter {
    fn convert(&self, _text: &str, _width: usize) -> Result<Vec<Line<'static>>, RenderError> {
        Err(RenderError::new("converter unavailable"))
    }
}
