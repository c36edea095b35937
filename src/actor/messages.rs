//! Actor message definitions.
//!
//! ```text
//! reload::server --AddClient--> WsActor <--Rebuilt-- FsActor
//! client reader  --RemoveClient-->
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::ws::ReloadSink;

/// Identity of one connected reload client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

impl ClientId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Messages to the WebSocket actor.
pub enum WsMsg {
    /// Register a client whose handshake already completed.
    AddClient {
        id: ClientId,
        sink: Box<dyn ReloadSink>,
    },
    /// Client connection closed or errored. Unknown ids are ignored.
    RemoveClient(ClientId),
    /// A rebuild finished, successfully or not.
    Rebuilt,
    /// Close every client and stop.
    Shutdown,
}

impl fmt::Debug for WsMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddClient { id, .. } => write!(f, "AddClient({id})"),
            Self::RemoveClient(id) => write!(f, "RemoveClient({id})"),
            Self::Rebuilt => f.write_str("Rebuilt"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}
