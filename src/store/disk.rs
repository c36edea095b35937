//! Durable store backed by the filesystem.
//!
//! Writes go to a sibling temp file that is renamed into place, so a reader
//! (or a static file server) never observes a half-written artifact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use jwalk::WalkDir;

use super::{Bytes, OutputStore, StoreError, StoreResult, WalkEntry, normalize};

/// Marker embedded in temp file names; the watcher ignores these.
pub const TEMP_MARKER: &str = ".folio-tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a logical path onto the filesystem.
    pub fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let path = normalize(path)?;
        Ok(path
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment)))
    }

    /// Inverse of [`resolve`](Self::resolve).
    fn logical(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!(
        ".{name}{TEMP_MARKER}-{}-{seq}",
        std::process::id()
    ))
}

fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(target);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, target)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

impl OutputStore for DiskStore {
    fn write(&self, path: &str, bytes: &[u8]) -> StoreResult<()> {
        let logical = normalize(path)?;
        if logical.is_empty() {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        let target = self.resolve(&logical)?;
        write_atomic(&target, bytes).map_err(|e| StoreError::Io(logical, e))
    }

    fn read(&self, path: &str) -> StoreResult<Bytes> {
        let logical = normalize(path)?;
        let target = self.resolve(&logical)?;
        match fs::read(&target) {
            Ok(bytes) => Ok(Arc::from(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(logical)),
            Err(_) if target.is_dir() => Err(StoreError::NotFound(logical)),
            Err(e) => Err(StoreError::Io(logical, e)),
        }
    }

    fn remove_all(&self, root: &str) -> StoreResult<()> {
        let logical = normalize(root)?;
        let target = self.resolve(&logical)?;
        let result = if target.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(logical, e)),
        }
    }

    fn walk(&self, root: &str) -> StoreResult<Vec<WalkEntry>> {
        let logical = normalize(root)?;
        let target = self.resolve(&logical)?;
        if !target.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&target).skip_hidden(false) {
            let entry = entry.map_err(|e| {
                StoreError::Io(logical.clone(), io::Error::other(e.to_string()))
            })?;
            if entry.depth() == 0 {
                continue;
            }
            let path = entry.path();
            if path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().contains(TEMP_MARKER))
            {
                continue;
            }
            if let Some(path_str) = self.logical(&path) {
                entries.push(WalkEntry {
                    path: path_str,
                    is_dir: entry.file_type().is_dir(),
                });
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.exists())
    }

    fn is_dir(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OutputArtifact;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());

        store.write("public/post/a/index.html", b"<h1>a</h1>").unwrap();

        let on_disk = dir.path().join("public/post/a/index.html");
        assert_eq!(fs::read(on_disk).unwrap(), b"<h1>a</h1>");
        assert!(store.is_dir("public/post"));
        assert!(store.exists("public/post/a/index.html"));
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());

        store.write("public/a.txt", b"1").unwrap();
        store.write("public/a.txt", b"2").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path().join("public"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt"]);
        assert_eq!(&*store.read("public/a.txt").unwrap(), b"2");
    }

    #[test]
    fn test_read_missing_and_directory() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());
        store.write("public/post/x.html", b"x").unwrap();

        assert!(matches!(
            store.read("public/nope.html"),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.read("public/post"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_remove_all_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());
        store.remove_all("public").unwrap();

        store.write("public/index.html", b"").unwrap();
        store.remove_all("public").unwrap();
        assert!(!store.exists("public"));
    }

    #[test]
    fn test_walk_sorted_with_dirs() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());
        store
            .write_batch(vec![
                OutputArtifact::new("public/style/main.css", "body{}"),
                OutputArtifact::new("public/index.html", "<p></p>"),
            ])
            .unwrap();

        let entries = store.walk("public").unwrap();
        let listed: Vec<_> = entries
            .iter()
            .map(|e| (e.path.as_str(), e.is_dir))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("public/index.html", false),
                ("public/style", true),
                ("public/style/main.css", false),
            ]
        );
        assert!(store.walk("missing").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(dir.path());
        assert!(matches!(
            store.write("../outside.txt", b"x"),
            Err(StoreError::InvalidPath(_))
        ));
        assert!(!store.exists("../outside.txt"));
    }
}
