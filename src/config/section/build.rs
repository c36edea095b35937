//! `build` section configuration.
//!
//! ```yaml
//! build:
//!   output: public           # logical output root
//!   content: content         # post records (*.yaml)
//!   pages: pages             # page templates
//!   layout: layout           # layout templates
//!   components: components   # shared partials
//!   assets: [assets, style]  # copied to <output>/<dir>
//!   minify: true             # minify HTML output
//!   feed: true               # public/feed.xml (production only)
//!   sitemap: true            # public/sitemap.xml (production only)
//! ```
//!
//! All directories are relative to the project root.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, paths_overlap};
use crate::store::normalize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output root inside the store.
    pub output: String,

    pub content: PathBuf,

    pub pages: PathBuf,

    pub layout: PathBuf,

    pub components: PathBuf,

    /// Static directories mirrored under the output root.
    pub assets: Vec<PathBuf>,

    /// Minify HTML output.
    pub minify: bool,

    /// Generate an RSS feed in production builds.
    pub feed: bool,

    /// Generate sitemap.xml in production builds.
    pub sitemap: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "public".into(),
            content: "content".into(),
            pages: "pages".into(),
            layout: "layout".into(),
            components: "components".into(),
            assets: vec!["assets".into(), "style".into()],
            minify: true,
            feed: true,
            sitemap: true,
        }
    }
}

impl BuildConfig {
    /// Source directories that feed a build, relative to the project root.
    pub fn source_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![
            self.content.clone(),
            self.pages.clone(),
            self.layout.clone(),
            self.components.clone(),
        ];
        dirs.extend(self.assets.iter().cloned());
        dirs
    }

    /// Production builds clear the output root, so it must stay clear of
    /// every source directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let output = match normalize(&self.output) {
            Ok(output) if !output.is_empty() => output,
            _ => {
                return Err(ConfigError::invalid(
                    "build.output",
                    format!("`{}` must be a relative path without `.` or `..`", self.output),
                ));
            }
        };
        for dir in self.source_dirs() {
            if dir.is_absolute() {
                return Err(ConfigError::invalid(
                    "build",
                    format!("`{}` must be relative to the project root", dir.display()),
                ));
            }
            // `..` sources live outside the project and cannot overlap
            let Some(source) = logical_dir(&dir) else {
                continue;
            };
            if paths_overlap(&output, &source) {
                return Err(ConfigError::invalid(
                    "build.output",
                    format!(
                        "`{}` overlaps source directory `{}`",
                        self.output,
                        dir.display()
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Source dir as a logical path, `.` segments dropped.
fn logical_dir(dir: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in dir.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}
