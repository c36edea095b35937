//! Core types shared across the codebase.

mod driver;
mod project;
mod state;

pub use driver::BuildMode;
pub use project::Project;
pub use state::{is_shutdown, register_server, request_shutdown, setup_shutdown_handler};
