//! Post records under `content/`.
//!
//! Every `*.yaml`/`*.yml` file directly inside the content directory is one
//! record. A record that fails to load is reported and skipped; the rest of
//! the build carries on.

mod record;
mod slug;

pub use record::{ContentRecordError, Post};
pub use slug::slugify;

use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;

use crate::config::SiteConfig;
use crate::debug;

/// Result of scanning the content directory.
#[derive(Debug, Default)]
pub struct LoadedRecords {
    /// Records in display order.
    pub posts: Vec<Post>,
    pub errors: Vec<ContentRecordError>,
}

/// Load every record and sort it by the display policy.
pub fn load_records(config: &SiteConfig) -> LoadedRecords {
    let dir = config.root_join(&config.build.content);
    let mut loaded = LoadedRecords::default();

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("content"; "no content directory at {}", dir.display());
            return loaded;
        }
        Err(e) => {
            loaded.errors.push(ContentRecordError::Io(dir, e));
            return loaded;
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_record_file(p))
        .collect();
    files.sort();

    for path in files {
        match Post::load(&path, config) {
            Ok(post) => loaded.posts.push(post),
            Err(e) => loaded.errors.push(e),
        }
    }

    sort_posts(&mut loaded.posts, config.use_pinned.active);
    loaded
}

fn is_record_file(path: &std::path::Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Display order: pinned first (when enabled), newest first, undated last,
/// then file name.
pub fn sort_posts(posts: &mut [Post], pinned_first: bool) {
    posts.sort_by(|a, b| {
        let pinned = if pinned_first {
            b.pinned.cmp(&a.pinned)
        } else {
            Ordering::Equal
        };
        let by_date = match (a.parsed_date, b.parsed_date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        pinned
            .then(by_date)
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
}
