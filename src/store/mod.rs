//! Output store: where compiled artifacts live.
//!
//! ```text
//! OutputStore
//! ├── DiskStore    durable, rooted at the project directory (`folio build`)
//! └── MemoryStore  ephemeral, snapshot-swapped per rebuild (`folio serve`)
//! ```
//!
//! Paths are logical, slash-separated and relative to the store root
//! (`public/post/hello/index.html`). Leading and trailing slashes are ignored
//! and `.`/`..` segments are rejected.

mod disk;
mod memory;

pub use disk::{DiskStore, TEMP_MARKER};
pub use memory::MemoryStore;

use std::sync::Arc;

use thiserror::Error;

/// Immutable artifact bytes, shared between the store and readers.
pub type Bytes = Arc<[u8]>;

/// One compiled output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub path: String,
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    pub fn new(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_html(&self) -> bool {
        self.path.ends_with(".html")
    }
}

/// Entry yielded by [`OutputStore::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: String,
    pub is_dir: bool,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("`{0}` not found")]
    NotFound(String),

    #[error("invalid store path `{0}`")]
    InvalidPath(String),

    #[error("IO error at `{0}`")]
    Io(String, #[source] std::io::Error),
}

impl StoreError {
    /// Logical path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound(path) | Self::InvalidPath(path) | Self::Io(path, _) => path,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Byte store addressed by logical paths.
///
/// Implementations must make `write` atomic per path: a concurrent reader
/// sees either the old bytes or the new bytes, never a partial file.
pub trait OutputStore: Send + Sync {
    fn write(&self, path: &str, bytes: &[u8]) -> StoreResult<()>;

    fn read(&self, path: &str) -> StoreResult<Bytes>;

    /// Remove `root` and everything below it. Missing roots are not an error.
    fn remove_all(&self, root: &str) -> StoreResult<()>;

    /// All entries below `root` (excluding `root` itself), sorted by path.
    fn walk(&self, root: &str) -> StoreResult<Vec<WalkEntry>>;

    fn exists(&self, path: &str) -> bool;

    fn is_dir(&self, path: &str) -> bool;

    /// Write a whole build.
    ///
    /// The default writes artifacts one by one and stops at the first error.
    fn write_batch(&self, artifacts: Vec<OutputArtifact>) -> StoreResult<()> {
        for artifact in artifacts {
            self.write(&artifact.path, &artifact.bytes)?;
        }
        Ok(())
    }
}

/// Normalize a logical path: trim slashes, collapse empty segments.
pub fn normalize(path: &str) -> StoreResult<String> {
    let mut parts = Vec::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" => continue,
            "." | ".." => return Err(StoreError::InvalidPath(path.to_string())),
            part => parts.push(part),
        }
    }
    Ok(parts.join("/"))
}

/// Join two logical path fragments.
pub fn join(base: &str, rest: &str) -> String {
    let base = base.trim_end_matches('/');
    let rest = rest.trim_start_matches('/');
    match (base.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{base}/{rest}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/public/index.html").unwrap(), "public/index.html");
        assert_eq!(normalize("public//post/").unwrap(), "public/post");
        assert_eq!(normalize("").unwrap(), "");
        assert!(matches!(
            normalize("public/../etc/passwd"),
            Err(StoreError::InvalidPath(_))
        ));
        assert!(normalize("./public").is_err());
    }

    #[test]
    fn test_join() {
        assert_eq!(join("public", "post/a"), "public/post/a");
        assert_eq!(join("public/", "/post"), "public/post");
        assert_eq!(join("", "index.html"), "index.html");
        assert_eq!(join("public", ""), "public");
    }

    #[test]
    fn test_error_path() {
        let err = StoreError::NotFound("public/x.html".into());
        assert_eq!(err.path(), "public/x.html");
        assert!(err.to_string().contains("public/x.html"));
    }
}
