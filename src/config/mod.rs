//! Site configuration management for `config.yaml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # build, serve, feature toggles
//! ├── error          # ConfigError
//! ├── util           # URL helpers, config file discovery
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Keys
//!
//! | Key              | Purpose                                     |
//! |------------------|---------------------------------------------|
//! | `siteTitle`      | Site title                                  |
//! | `baseUrl`        | Public URL of the site (`base_url` accepted) |
//! | `userUrl`        | Author profile link                         |
//! | `email`          | Default author email                        |
//! | `useSectionPost` | `latest` list toggle and size               |
//! | `usePinned`      | Pinned posts toggle                         |
//! | `build`          | Paths, minify, feed, sitemap                |
//! | `serve`          | Development server                          |
//!
//! The config is reloaded at the start of every build, so edits to
//! `config.yaml` take effect on the next rebuild in serve mode.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{BuildConfig, PinnedConfig, SectionPostConfig, ServeConfig};
pub use util::{find_config_file, join_url, normalize_base_url, paths_overlap};

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::log;

/// Root configuration structure representing `config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory, parent of the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub site_title: String,

    #[serde(alias = "base_url")]
    pub base_url: String,

    pub user_url: String,

    pub email: String,

    pub use_section_post: SectionPostConfig,

    pub use_pinned: PinnedConfig,

    pub build: BuildConfig,

    pub serve: ServeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            site_title: String::new(),
            base_url: "/".into(),
            user_url: String::new(),
            email: String::new(),
            use_section_post: SectionPostConfig::default(),
            use_pinned: PinnedConfig::default(),
            build: BuildConfig::default(),
            serve: ServeConfig::default(),
        }
    }
}

/// Values passed on the command line that win over `config.yaml`.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub minify: Option<bool>,
    pub base_url: Option<String>,
    pub interface: Option<IpAddr>,
    pub port: Option<u16>,
    pub watch: Option<bool>,
}

impl SiteConfig {
    /// Load, override and validate the configuration at `path`.
    pub fn load(path: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = Self::from_path(path)?;
        config.config_path = path.to_path_buf();
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .map_err(|err| ConfigError::Yaml(path.to_path_buf(), err))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse YAML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty mapping.
        if content.trim().is_empty() {
            return Ok((Self::default(), Vec::new()));
        }

        let mut ignored = Vec::new();
        let deserializer = serde_yaml::Deserializer::from_str(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        Self::update_option(&mut self.build.minify, overrides.minify.as_ref());
        Self::update_option(&mut self.base_url, overrides.base_url.as_ref());
        Self::update_option(&mut self.serve.interface, overrides.interface.as_ref());
        Self::update_option(&mut self.serve.port, overrides.port.as_ref());
        Self::update_option(&mut self.serve.watch, overrides.watch.as_ref());
        self.base_url = normalize_base_url(&self.base_url);
    }

    /// Development builds are served from the local root.
    pub fn apply_dev_mode(&mut self) {
        self.base_url = "/".into();
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !util::is_valid_base_url(&self.base_url) {
            return Err(ConfigError::invalid(
                "baseUrl",
                format!(
                    "`{}` must be an absolute URL or start with `/`",
                    self.base_url
                ),
            ));
        }
        if self.serve.port != 0 && self.serve.port == self.serve.ws_port {
            return Err(ConfigError::invalid(
                "serve.wsPort",
                "must differ from serve.port",
            ));
        }
        self.build.validate()
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get path relative to the site root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Absolute (or root-relative in dev) URL of a site-relative link.
    pub fn full_url(&self, link: &str) -> String {
        join_url(&self.base_url, link)
    }

    /// Files and directories the watcher observes.
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self
            .build
            .source_dirs()
            .into_iter()
            .map(|dir| self.root_join(dir))
            .collect();
        paths.push(self.config_path.clone());
        paths
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
