//! Static asset copy: `<dir>/...` in the project becomes `<output>/<dir>/...`.

use std::path::Path;

use rayon::prelude::*;

use super::report::{BuildIssue, IssueKind};
use crate::compiler::minify::minify_asset;
use crate::config::SiteConfig;
use crate::store::{DiskStore, OutputArtifact, OutputStore, StoreResult, join};

/// Assets gathered for one build.
#[derive(Debug, Default)]
pub struct CollectedAssets {
    pub artifacts: Vec<OutputArtifact>,
    pub issues: Vec<BuildIssue>,
}

/// Read every file below the configured asset directories.
///
/// CSS and JS are minified when `minify` is set; a file the minifier
/// rejects is copied verbatim.
pub fn collect(config: &SiteConfig, minify: bool) -> CollectedAssets {
    let source = DiskStore::new(&config.root);
    let mut collected = CollectedAssets::default();

    for dir in &config.build.assets {
        let logical = logical_dir(dir);
        let entries = match source.walk(&logical) {
            Ok(entries) => entries,
            Err(e) => {
                collected
                    .issues
                    .push(BuildIssue::new(IssueKind::Asset, &logical, e.to_string()));
                continue;
            }
        };

        let results: Vec<_> = entries
            .par_iter()
            .filter(|entry| !entry.is_dir)
            .map(|entry| -> StoreResult<OutputArtifact> {
                let bytes = source.read(&entry.path)?;
                let bytes = match minify.then(|| minify_asset(&entry.path, &bytes)).flatten() {
                    Some(minified) => minified,
                    None => bytes.to_vec(),
                };
                Ok(OutputArtifact::new(
                    join(&config.build.output, &entry.path),
                    bytes,
                ))
            })
            .collect();

        for result in results {
            match result {
                Ok(artifact) => collected.artifacts.push(artifact),
                Err(e) => collected.issues.push(BuildIssue::new(
                    IssueKind::Asset,
                    e.path(),
                    e.to_string(),
                )),
            }
        }
    }

    collected
}

/// Slash-separated form of a configured directory.
fn logical_dir(dir: &Path) -> String {
    dir.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
