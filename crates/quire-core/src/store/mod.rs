//! Content store: the documents a session browses.
//!
//! The store is read-only at runtime and shared by every session, so
//! implementations must be `Send + Sync` and free of interior mutation that
//! sessions could observe.

pub mod frontmatter;
mod fs;

use std::fmt;
use std::path::PathBuf;

pub use fs::FsContentStore;

/// Identifier of a document inside a store, without extension (`posts/hello`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath(String);

impl DocumentPath {
    const LANDING: &'static str = "root";

    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The document shown on the landing view.
    pub fn landing() -> Self {
        Self::new(Self::LANDING)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment (`hello` for `posts/hello`).
    pub fn file_stem(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata-only view of a document, used by the list and preview cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub path: DocumentPath,
    pub title: String,
    pub description: String,
}

/// A fully loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: DocumentPath,
    pub title: String,
    pub description: String,
    pub body: String,
}

impl Document {
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            path: self.path.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

/// Categories of store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// The store or a file in it could not be read.
    Io,
    /// The requested document does not exist.
    NotFound,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErrorKind::Io => write!(f, "io"),
            StoreErrorKind::NotFound => write!(f, "not_found"),
        }
    }
}

/// Error returned by [`ContentStore`] operations.
#[derive(Debug, Clone)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    /// File or directory the operation touched.
    pub path: PathBuf,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StoreErrorKind::NotFound, path, "no such document")
    }

    /// Maps an I/O error, keeping `NotFound` distinct from other failures.
    pub fn from_io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let kind = if err.kind() == std::io::ErrorKind::NotFound {
            StoreErrorKind::NotFound
        } else {
            StoreErrorKind::Io
        };
        Self::new(kind, path, err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == StoreErrorKind::NotFound
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.path.display(), self.kind, self.message)
    }
}

impl std::error::Error for StoreError {}

/// Read-only source of documents.
pub trait ContentStore: Send + Sync {
    /// Enumerates documents in display order, without loading bodies.
    ///
    /// # Errors
    /// Returns `StoreErrorKind::Io` when the store cannot be enumerated.
    fn list(&self) -> Result<Vec<DocumentSummary>, StoreError>;

    /// Loads one document with its body.
    ///
    /// # Errors
    /// Returns `StoreErrorKind::NotFound` for unknown paths and
    /// `StoreErrorKind::Io` for read failures.
    fn load(&self, path: &DocumentPath) -> Result<Document, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(DocumentPath::new("posts/hello").file_stem(), "hello");
        assert_eq!(DocumentPath::landing().file_stem(), "root");
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(StoreError::from_io("x.md", &err).is_not_found());

        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(StoreError::from_io("x.md", &err).kind, StoreErrorKind::Io);
    }
}
