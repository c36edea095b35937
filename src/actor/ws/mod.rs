//! WebSocket actor: the reload broadcaster.
//!
//! Owns the [`ClientSet`]. Registration, removal and rebuild notifications
//! all arrive as [`WsMsg`]s, so the set is never shared across tasks.
//!
//! ```text
//! reload::server --AddClient-->    ┐
//! client reader  --RemoveClient--> ├─► WsActor --"reload"--► clients
//! FsActor        --Rebuilt-->      ┘
//! ```

mod client_io;
mod clients;

pub use client_io::attach;
pub use clients::{ClientSet, ReloadSink};

use tokio::sync::mpsc;

use super::messages::WsMsg;
use crate::debug;

/// Text frame sent to every client after a rebuild.
pub const RELOAD_MESSAGE: &str = "reload";

pub struct WsActor {
    rx: mpsc::Receiver<WsMsg>,
    clients: ClientSet,
}

impl WsActor {
    pub fn new(rx: mpsc::Receiver<WsMsg>) -> Self {
        Self {
            rx,
            clients: ClientSet::new(),
        }
    }

    /// Run until `Shutdown` or every sender is dropped.
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                WsMsg::AddClient { id, sink } => self.clients.register(id, sink),
                WsMsg::RemoveClient(id) => {
                    self.clients.unregister(id);
                }
                WsMsg::Rebuilt => {
                    let dropped = self.clients.broadcast(RELOAD_MESSAGE);
                    if !dropped.is_empty() {
                        debug!("ws"; "dropped {} dead clients", dropped.len());
                    }
                }
                WsMsg::Shutdown => {
                    debug!("ws"; "shutting down");
                    break;
                }
            }
        }
        self.clients.close_all();
    }
}
