//! In-memory store for the dev server.
//!
//! Readers load the current snapshot without locking; writers build a new
//! snapshot under a mutex and publish it with one pointer swap. A batch
//! (one whole rebuild) is published as a single snapshot, so a reader sees
//! either all of build N or all of build N+1.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use super::{
    Bytes, OutputArtifact, OutputStore, StoreError, StoreResult, WalkEntry, join, normalize,
};

type Snapshot = BTreeMap<String, Bytes>;

#[derive(Default)]
pub struct MemoryStore {
    files: ArcSwap<Snapshot>,
    /// Serializes writers; readers never take it.
    writer: Mutex<()>,
    /// Number of snapshots published so far.
    generation: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.files.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.load().is_empty()
    }

    /// Apply `f` to a private copy of the current snapshot and publish it.
    fn mutate<T>(&self, f: impl FnOnce(&mut Snapshot) -> StoreResult<T>) -> StoreResult<T> {
        let _guard = self.writer.lock();
        let mut next = Snapshot::clone(&self.files.load());
        let out = f(&mut next)?;
        self.files.store(Arc::new(next));
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(out)
    }
}

fn is_below(key: &str, root: &str) -> bool {
    root.is_empty() || key == root || (key.starts_with(root) && key[root.len()..].starts_with('/'))
}

impl OutputStore for MemoryStore {
    fn write(&self, path: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = normalize(path)?;
        if path.is_empty() {
            return Err(StoreError::InvalidPath(path));
        }
        let bytes: Bytes = Arc::from(bytes);
        self.mutate(|files| {
            files.insert(path, bytes);
            Ok(())
        })
    }

    fn read(&self, path: &str) -> StoreResult<Bytes> {
        let path = normalize(path)?;
        self.files
            .load()
            .get(&path)
            .cloned()
            .ok_or(StoreError::NotFound(path))
    }

    fn remove_all(&self, root: &str) -> StoreResult<()> {
        let root = normalize(root)?;
        self.mutate(|files| {
            files.retain(|key, _| !is_below(key, &root));
            Ok(())
        })
    }

    fn walk(&self, root: &str) -> StoreResult<Vec<WalkEntry>> {
        let root = normalize(root)?;
        let files = self.files.load();

        let mut dirs = BTreeSet::new();
        let mut entries = Vec::new();
        for key in files.keys().filter(|key| is_below(key, &root) && *key != &root) {
            // Every ancestor between root and the file is an implied directory.
            let rel = if root.is_empty() {
                key.as_str()
            } else {
                &key[root.len() + 1..]
            };
            let mut prefix = String::new();
            let segments: Vec<_> = rel.split('/').collect();
            for segment in &segments[..segments.len() - 1] {
                prefix = join(&prefix, segment);
                dirs.insert(join(&root, &prefix));
            }
            entries.push(WalkEntry {
                path: key.clone(),
                is_dir: false,
            });
        }

        entries.extend(dirs.into_iter().map(|path| WalkEntry { path, is_dir: true }));
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn exists(&self, path: &str) -> bool {
        let Ok(path) = normalize(path) else {
            return false;
        };
        self.files.load().contains_key(&path) || self.is_dir(&path)
    }

    fn is_dir(&self, path: &str) -> bool {
        let Ok(path) = normalize(path) else {
            return false;
        };
        let files = self.files.load();
        if path.is_empty() {
            return !files.is_empty();
        }
        let prefix = format!("{path}/");
        files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }

    fn write_batch(&self, artifacts: Vec<OutputArtifact>) -> StoreResult<()> {
        // Validate everything before publishing anything.
        let mut staged = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let path = normalize(&artifact.path)?;
            if path.is_empty() {
                return Err(StoreError::InvalidPath(artifact.path));
            }
            staged.push((path, Bytes::from(artifact.bytes)));
        }

        self.mutate(|files| {
            files.extend(staged);
            Ok(())
        })
    }
}
