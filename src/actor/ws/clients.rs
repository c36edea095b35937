//! The set of connected reload clients.

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::actor::messages::ClientId;
use crate::debug;

/// Something a reload notification can be pushed to.
///
/// Implemented by server-side WebSocket connections; tests use in-memory
/// fakes.
pub trait ReloadSink: Send {
    fn send_text(&mut self, text: &str) -> tungstenite::Result<()>;

    /// Best-effort close; errors are ignored.
    fn close(&mut self) {}
}

/// Connected clients, owned by the WebSocket actor.
#[derive(Default)]
pub struct ClientSet {
    clients: FxHashMap<ClientId, Box<dyn ReloadSink>>,
}

impl ClientSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id)
    }

    pub fn register(&mut self, id: ClientId, sink: Box<dyn ReloadSink>) {
        self.clients.insert(id, sink);
        debug!("ws"; "client {} connected (total: {})", id, self.clients.len());
    }

    /// Drop a client. Returns `false` if it was already gone.
    pub fn unregister(&mut self, id: ClientId) -> bool {
        let removed = self.clients.remove(&id).is_some();
        if removed {
            debug!("ws"; "client {} disconnected (total: {})", id, self.clients.len());
        }
        removed
    }

    /// Send `text` to every client in parallel.
    ///
    /// Clients whose send fails are removed; their ids are returned. A failure
    /// never stops delivery to the others.
    pub fn broadcast(&mut self, text: &str) -> Vec<ClientId> {
        if self.clients.is_empty() {
            debug!("ws"; "no clients connected");
            return Vec::new();
        }

        let mut failed: Vec<ClientId> = self
            .clients
            .par_iter_mut()
            .filter_map(|(id, sink)| match sink.send_text(text) {
                Ok(()) => None,
                Err(e) => {
                    debug!("ws"; "client {} send failed: {}", id, e);
                    Some(*id)
                }
            })
            .collect();
        failed.sort();

        for id in &failed {
            self.clients.remove(id);
        }
        debug!("ws"; "broadcast to {} clients", self.clients.len());
        failed
    }

    /// Close and forget every client.
    pub fn close_all(&mut self) {
        for (_, mut sink) in self.clients.drain() {
            sink.close();
        }
    }
}
