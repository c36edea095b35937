//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors. All of them abort a build.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file `{0}` could not be parsed")]
    Yaml(PathBuf, #[source] serde_yaml::Error),

    #[error("invalid `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}
