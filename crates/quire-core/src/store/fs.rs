use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

use super::frontmatter::{self, Metadata};
use super::{ContentStore, Document, DocumentPath, DocumentSummary, StoreError, StoreErrorKind};

const POSTS_DIR: &str = "posts";
const EXTENSION: &str = "md";

/// Filesystem-backed store.
///
/// Layout:
/// - `<root>/root.md`: landing document
/// - `<root>/posts/*.md`: listed documents, ordered by file name
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a document path to its file, rejecting anything that would
    /// leave the store root.
    fn file_path(&self, path: &DocumentPath) -> Option<PathBuf> {
        let relative = Path::new(path.as_str());
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !contained || path.as_str().is_empty() {
            return None;
        }
        Some(self.root.join(format!("{}.{EXTENSION}", path.as_str())))
    }
}

/// Reads an entry and splits its header, degrading a malformed header to
/// empty metadata.
fn parse_document(path: DocumentPath, file: &Path, content: &str) -> Document {
    let (metadata, body) = match frontmatter::split(content) {
        Ok(parts) => parts,
        Err(err) => {
            warn!(file = %file.display(), error = %err, "malformed front matter, using empty metadata");
            (Metadata::default(), content.to_string())
        }
    };

    let title = metadata
        .get("title")
        .map_or_else(|| path.file_stem().to_string(), str::to_string);
    let description = metadata
        .get("description")
        .or_else(|| metadata.get("subtitle"))
        .unwrap_or_default()
        .to_string();

    Document {
        path,
        title,
        description,
        body,
    }
}

impl ContentStore for FsContentStore {
    fn list(&self) -> Result<Vec<DocumentSummary>, StoreError> {
        let dir = self.root.join(POSTS_DIR);
        let entries = fs::read_dir(&dir)
            .map_err(|err| StoreError::new(StoreErrorKind::Io, &dir, err.to_string()))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .collect();
        files.sort();

        let mut summaries = Vec::with_capacity(files.len());
        for file in files {
            let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
                warn!(file = %file.display(), "skipping document with non-UTF-8 name");
                continue;
            };
            let path = DocumentPath::new(format!("{POSTS_DIR}/{stem}"));
            match fs::read_to_string(&file) {
                Ok(content) => summaries.push(parse_document(path, &file, &content).summary()),
                Err(err) => warn!(file = %file.display(), error = %err, "skipping unreadable document"),
            }
        }

        Ok(summaries)
    }

    fn load(&self, path: &DocumentPath) -> Result<Document, StoreError> {
        let file = self
            .file_path(path)
            .ok_or_else(|| StoreError::not_found(path.as_str()))?;
        let content = fs::read_to_string(&file).map_err(|err| StoreError::from_io(&file, &err))?;
        Ok(parse_document(path.clone(), &file, &content))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_list_orders_by_file_name_and_reads_metadata() {
        let dir = tempdir().unwrap();
        write(dir.path(), "posts/b.md", "---\ntitle: Second\nsubtitle: two\n---\n\nbody");
        write(dir.path(), "posts/a.md", "---\ntitle: First\ndescription: one\n---\n\nbody");
        write(dir.path(), "posts/notes.txt", "ignored");

        let store = FsContentStore::new(dir.path());
        let list = store.list().unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].path.as_str(), "posts/a");
        assert_eq!(list[0].title, "First");
        assert_eq!(list[0].description, "one");
        assert_eq!(list[1].title, "Second");
        assert_eq!(list[1].description, "two");
    }

    #[test]
    fn test_list_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let store = FsContentStore::new(dir.path().join("missing"));
        let err = store.list().unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Io);

        write(dir.path(), "posts", "not a directory");
        let err = FsContentStore::new(dir.path()).list().unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Io);
    }

    #[test]
    fn test_load_landing_document() {
        let dir = tempdir().unwrap();
        write(dir.path(), "root.md", "# Welcome");

        let doc = FsContentStore::new(dir.path())
            .load(&DocumentPath::landing())
            .unwrap();
        assert_eq!(doc.title, "root");
        assert_eq!(doc.body, "# Welcome");
    }

    #[test]
    fn test_load_keeps_dots_in_names() {
        let dir = tempdir().unwrap();
        write(dir.path(), "posts/v1.2-notes.md", "dotted");
        let store = FsContentStore::new(dir.path());

        let list = store.list().unwrap();
        assert_eq!(list[0].path.as_str(), "posts/v1.2-notes");
        assert_eq!(store.load(&list[0].path).unwrap().body, "dotted");
    }

    #[test]
    fn test_load_missing_document_is_not_found() {
        let dir = tempdir().unwrap();
        let err = FsContentStore::new(dir.path())
            .load(&DocumentPath::new("posts/nope"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_rejects_escaping_paths() {
        let dir = tempdir().unwrap();
        write(dir.path(), "secret.md", "x");
        let store = FsContentStore::new(dir.path().join("posts"));

        let err = store.load(&DocumentPath::new("../secret")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_header_falls_back_to_body() {
        let dir = tempdir().unwrap();
        write(dir.path(), "posts/broken.md", "---\ntitle: never closed\ntext");

        let doc = FsContentStore::new(dir.path())
            .load(&DocumentPath::new("posts/broken"))
            .unwrap();
        assert_eq!(doc.title, "broken");
        assert_eq!(doc.body, "---\ntitle: never closed\ntext");
    }
}
