//! Handle on a project directory.

use std::path::{Path, PathBuf};

use crate::config::{ConfigError, ConfigOverrides, SiteConfig};

/// Where a project lives and how the command line overrides its config.
///
/// Cheap to clone; the watcher keeps one and reloads the config from it on
/// every rebuild.
#[derive(Debug, Clone)]
pub struct Project {
    config_path: PathBuf,
    overrides: ConfigOverrides,
}

impl Project {
    pub fn new(config_path: impl Into<PathBuf>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path: config_path.into(),
            overrides,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Project root, the directory holding the config file.
    pub fn root(&self) -> &Path {
        self.config_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Read a fresh config snapshot.
    pub fn load_config(&self) -> Result<SiteConfig, ConfigError> {
        SiteConfig::load(&self.config_path, &self.overrides)
    }
}
