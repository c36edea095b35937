//! `folio build`: production build to disk.
//!
//! The output root is cleared and rewritten inside the project directory.
//! Issues are reported but only a bad config or a failed write aborts.

use anyhow::{Context, Result};

use crate::core::{BuildMode, Project};
use crate::log;
use crate::pipeline::{BuildReport, run_build};
use crate::store::DiskStore;

/// Build `project` into `<root>/<build.output>`.
pub fn build_site(project: &Project) -> Result<BuildReport> {
    let store = DiskStore::new(project.root());
    let report = run_build(project, &store, BuildMode::Production)
        .with_context(|| format!("build of {} failed", project.config_path().display()))?;
    log_report(&report);
    Ok(report)
}

/// Overwrites and issues first, summary last.
pub fn log_report(report: &BuildReport) {
    for path in &report.overwritten {
        log!("warning"; "{} written by more than one post, the last one wins", path);
    }
    for issue in &report.issues {
        log!("warning"; "{}", issue);
    }
    log!("build"; "{}", report.summary());
}
