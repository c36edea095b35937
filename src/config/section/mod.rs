//! Configuration section definitions.
//!
//! | Module     | YAML key                         | Purpose                     |
//! |------------|----------------------------------|-----------------------------|
//! | `build`    | `build`                          | Source/output paths, toggles |
//! | `features` | `useSectionPost`, `usePinned`    | Template feature toggles    |
//! | `serve`    | `serve`                          | Development server          |

mod build;
mod features;
mod serve;

pub use build::BuildConfig;
pub use features::{PinnedConfig, SectionPostConfig};
pub use serve::ServeConfig;
