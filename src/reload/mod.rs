//! Live reload transport.
//!
//! The HTTP server cannot hand over its raw socket for an upgrade, so the
//! reload channel has its own listener. Browsers open `ws://<host>:<wsPort>/ws`
//! and receive a single `reload` text frame after every rebuild.
//!
//! - `server` - WebSocket listener feeding clients to the `WsActor`

pub mod server;

pub use server::{WS_PATH, bind, start};
