use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::store::TEMP_MARKER;

pub(super) const DEBOUNCE_MS: u64 = 200;

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub(super) fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Pure debouncer: only handles timing and event deduplication.
pub(super) struct Debouncer {
    /// Path → ChangeKind (dedup is free via HashMap key uniqueness)
    pub(super) changes: FxHashMap<PathBuf, ChangeKind>,
    pub(super) last_event: Option<Instant>,
    window: Duration,
}

impl Debouncer {
    pub(super) fn new() -> Self {
        Self::with_window(Duration::from_millis(DEBOUNCE_MS))
    }

    pub(super) fn with_window(window: Duration) -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            window,
        }
    }

    /// Add a notify event, applying dedup rules:
    /// - Remove + Create/Modify → Create/Modify (file was restored)
    /// - Modify + Remove → Remove (file was deleted)
    /// - Create + Remove → nothing happened
    /// - otherwise the first event wins
    ///
    /// Returns whether the event counted.
    pub(super) fn add_event(&mut self, event: &notify::Event) -> bool {
        use notify::EventKind;
        use notify::event::ModifyKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            // chmod/mtime noise would loop forever against our own reads
            EventKind::Modify(ModifyKind::Metadata(_)) => return false,
            EventKind::Modify(_) => ChangeKind::Modified,
            _ => return false,
        };

        let mut counted = false;
        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            counted = true;
            self.last_event = Some(Instant::now());

            match self.changes.get(path).copied() {
                None => {
                    crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
                    self.changes.insert(path.clone(), kind);
                }
                Some(ChangeKind::Removed) if kind != ChangeKind::Removed => {
                    self.changes.insert(path.clone(), kind);
                }
                Some(ChangeKind::Modified) if kind == ChangeKind::Removed => {
                    self.changes.insert(path.clone(), ChangeKind::Removed);
                }
                Some(ChangeKind::Created) if kind == ChangeKind::Removed => {
                    self.changes.remove(path);
                }
                Some(_) => {}
            }
        }
        counted
    }

    /// Take the pending changes once the window has passed without events.
    ///
    /// `Some` with an empty map is possible when changes cancelled out; the
    /// caller still rebuilds since the tree may differ from the last build.
    pub(super) fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        Some(std::mem::take(&mut self.changes))
    }

    pub(super) fn is_ready(&self) -> bool {
        self.last_event
            .is_some_and(|last| last.elapsed() >= self.window)
    }

    /// Precise sleep duration until the next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };
        self.window
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }

    /// Events arrived that have not been taken yet.
    pub(super) fn is_pending(&self) -> bool {
        self.last_event.is_some()
    }
}

/// Editor artifacts and our own atomic-write temp files.
pub(super) fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "swx" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
        || name.starts_with('#')
        || name.contains(TEMP_MARKER)
}
