//! Build mode for production and development builds.

/// How a build is produced and where it goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Durable output: clears the output root first, minifies assets,
    /// emits sitemap and feed.
    Production,

    /// Ephemeral output for `serve`: keeps prior output, forces the base
    /// URL to `/` and injects the live-reload client when watching.
    Development {
        /// Port the live-reload client connects to, `None` without watching.
        ws_port: Option<u16>,
    },
}

impl BuildMode {
    #[inline]
    pub const fn is_dev(&self) -> bool {
        matches!(self, Self::Development { .. })
    }

    /// Port for the injected live-reload script, if any.
    #[inline]
    pub const fn ws_port(&self) -> Option<u16> {
        match self {
            Self::Development { ws_port } => *ws_port,
            Self::Production => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development { .. } => "development",
        }
    }
}
