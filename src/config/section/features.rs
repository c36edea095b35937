//! Template feature toggles.
//!
//! ```yaml
//! useSectionPost:
//!   active: true
//!   limitOfPost: 5     # size of the `latest` list on pages
//! usePinned:
//!   active: false      # pinned posts sort first and are exposed as `pinned`
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionPostConfig {
    pub active: bool,
    pub limit_of_post: usize,
}

impl Default for SectionPostConfig {
    fn default() -> Self {
        Self {
            active: true,
            limit_of_post: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinnedConfig {
    pub active: bool,
}
