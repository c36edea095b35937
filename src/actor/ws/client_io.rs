//! Server-side WebSocket connections.
//!
//! A connection is split in two over cloned `TcpStream`s: the write half is
//! handed to the actor as a [`ReloadSink`], the read half gets its own
//! thread that only watches for the client going away. Frames are only
//! ever written through the sink.

use std::io::{self, Read};
use std::net::TcpStream;

use tokio::sync::mpsc;
use tungstenite::{Message, WebSocket};

use super::ReloadSink;
use crate::actor::messages::{ClientId, WsMsg};
use crate::debug;

impl ReloadSink for WebSocket<TcpStream> {
    fn send_text(&mut self, text: &str) -> tungstenite::Result<()> {
        self.send(Message::text(text.to_owned()))
    }

    fn close(&mut self) {
        let _ = WebSocket::close(self, None);
        let _ = self.flush();
    }
}

/// Register an upgraded connection with the actor and start its read loop.
pub fn attach(ws: WebSocket<TcpStream>, tx: &mpsc::Sender<WsMsg>) -> io::Result<ClientId> {
    let id = ClientId::next();
    let read_half = ws.get_ref().try_clone()?;

    tx.blocking_send(WsMsg::AddClient {
        id,
        sink: Box::new(ws),
    })
    .map_err(|_| io::Error::other("reload actor stopped"))?;

    let tx = tx.clone();
    std::thread::spawn(move || read_until_closed(id, read_half, tx));
    Ok(id)
}

/// Discard incoming bytes until the client hangs up, then unregister.
///
/// The actor owns the only writer on the socket, so no frame is parsed or
/// answered here. A client that sends Close and keeps the connection open
/// is dropped on the next failed reload write instead.
fn read_until_closed(id: ClientId, mut stream: TcpStream, tx: mpsc::Sender<WsMsg>) {
    let mut buf = [0u8; 512];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(_) => continue,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("ws"; "client {} read ended: {}", id, e);
                break;
            }
        }
    }
    let _ = tx.blocking_send(WsMsg::RemoveClient(id));
}
