//! Actor system for serve mode.
//!
//! ```text
//! FsActor ──(rebuild on blocking worker)──► WsActor ──"reload"──► clients
//! (watch + debounce)                        (client set)
//!                                               ▲
//! reload::server ──AddClient/RemoveClient───────┘
//! ```
//!
//! - `messages` - message types between actors
//! - `fs` - file watcher, debouncer and rebuild loop
//! - `ws` - reload broadcaster owning the client set
//! - `coordinator` - wires up and runs the actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod ws;

pub use coordinator::Coordinator;
