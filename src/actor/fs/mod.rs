//! FileSystem Actor
//!
//! Watches the project sources, coalesces bursts of events and runs one
//! rebuild per burst.
//!
//! ```text
//! notify → bridge thread (filter) → Debouncer → rebuild (blocking) → WsMsg::Rebuilt
//! ```
//!
//! The rebuild is awaited inside the loop, so at most one runs at a time.
//! Events that arrive meanwhile wait in the channel and produce exactly one
//! more rebuild once it finishes.

mod debouncer;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;

use super::messages::WsMsg;
use crate::{debug, log};
use debouncer::{ChangeKind, Debouncer};

/// Work to run after each debounced burst. Called on a blocking worker.
pub type RebuildFn = Arc<dyn Fn() + Send + Sync>;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    filter: WatchFilter,
    rebuild: RebuildFn,
    ws_tx: mpsc::Sender<WsMsg>,
}

impl FsActor {
    /// Start watching `paths` immediately.
    ///
    /// Events are buffered from this point on, so changes made while the
    /// caller runs the initial build are not lost. Paths that do not exist
    /// are logged and skipped.
    pub fn new(
        paths: Vec<PathBuf>,
        rebuild: RebuildFn,
        ws_tx: mpsc::Sender<WsMsg>,
    ) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;
        let filter = WatchFilter::attach(&mut watcher, &paths)?;

        Ok(Self {
            notify_rx,
            _watcher: watcher,
            filter,
            rebuild,
            ws_tx,
        })
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let filter = self.filter;
        let (async_tx, async_rx) = mpsc::channel::<notify::Event>(64);

        // notify is sync; forward relevant events into the async loop
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(mut event) => {
                        event.paths.retain(|path| filter.is_relevant(path));
                        if event.paths.is_empty() {
                            continue;
                        }
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => log!("watch"; "notify error: {}", e),
                }
            }
        });

        // keep the watcher alive for as long as the loop runs
        let _watcher = self._watcher;
        run_loop(async_rx, Debouncer::new(), self.rebuild, self.ws_tx).await;
    }
}

/// Debounce `events` and rebuild once per burst.
///
/// Ends when either channel closes.
async fn run_loop(
    mut events: mpsc::Receiver<notify::Event>,
    mut debouncer: Debouncer,
    rebuild: RebuildFn,
    ws_tx: mpsc::Sender<WsMsg>,
) {
    loop {
        tokio::select! {
            biased;
            event = events.recv() => match event {
                Some(event) => {
                    debouncer.add_event(&event);
                }
                None => break,
            },
            _ = tokio::time::sleep(debouncer.sleep_duration()), if debouncer.is_pending() => {
                let Some(changes) = debouncer.take_if_ready() else {
                    continue;
                };
                log_changes(&changes);

                let rebuild = Arc::clone(&rebuild);
                if let Err(e) = tokio::task::spawn_blocking(move || rebuild()).await {
                    log!("watch"; "rebuild task failed: {}", e);
                }
                if ws_tx.send(WsMsg::Rebuilt).await.is_err() {
                    debug!("watch"; "reload actor gone, stopping");
                    break;
                }
            }
        }
    }
}

fn log_changes(changes: &FxHashMap<PathBuf, ChangeKind>) {
    match change_summary(changes) {
        Some(summary) => log!("watch"; "{}", summary),
        None => debug!("watch"; "changes cancelled out, rebuilding anyway"),
    }
}

/// One line naming the first changed path in path order.
fn change_summary(changes: &FxHashMap<PathBuf, ChangeKind>) -> Option<String> {
    let mut paths: Vec<_> = changes.iter().collect();
    paths.sort_by(|a, b| a.0.cmp(b.0));
    let ((path, kind), rest) = paths.split_first()?;
    let line = format!("{} {}", kind.label(), display_name(path));
    Some(match rest.len() {
        0 => line,
        more => format!("{line} (+{more} more)"),
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Which event paths belong to the project sources.
///
/// Directories are watched recursively. Single files (the config) are
/// watched through their parent, since editors often replace a file by
/// renaming over it, which would drop a direct watch.
#[derive(Debug, Default)]
struct WatchFilter {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

impl WatchFilter {
    fn attach(watcher: &mut RecommendedWatcher, paths: &[PathBuf]) -> notify::Result<Self> {
        let mut filter = Self::default();
        for path in paths {
            let Ok(path) = path.canonicalize() else {
                log!("watch"; "{} does not exist, not watching it", path.display());
                continue;
            };
            if path.is_dir() {
                watcher.watch(&path, RecursiveMode::Recursive)?;
                debug!("watch"; "watching {}", path.display());
                filter.dirs.push(path);
            } else if let Some(parent) = path.parent() {
                watcher.watch(parent, RecursiveMode::NonRecursive)?;
                debug!("watch"; "watching {}", path.display());
                filter.files.push(path);
            }
        }
        Ok(filter)
    }

    fn is_relevant(&self, path: &Path) -> bool {
        self.dirs.iter().any(|dir| path.starts_with(dir)) || self.files.iter().any(|f| f == path)
    }
}
