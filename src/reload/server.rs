//! WebSocket server for live reload.
//!
//! Accepts connections on a dedicated port, performs the handshake on a
//! per-connection thread and hands the upgraded socket to the `WsActor`.

use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tungstenite::http::StatusCode;

use crate::actor::messages::WsMsg;
use crate::actor::ws::attach;
use crate::{debug, log};

/// Only path that may be upgraded.
pub const WS_PATH: &str = "/ws";

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// A client that never finishes its handshake must not pin a thread forever.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bind the reload listener, trying the following ports if `base_port` is busy.
///
/// Returns the listener and the port actually bound; the dev build injects
/// that port into every page.
pub fn bind(interface: IpAddr, base_port: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(SocketAddr::new(interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                if offset > 0 {
                    log!("reload"; "port {} in use, using {} instead", base_port, actual_port);
                }
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind reload server after {} attempts: {}",
        MAX_PORT_RETRIES,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Spawn the acceptor thread.
///
/// Stops once the actor behind `ws_tx` is gone or shutdown was requested.
pub fn start(listener: TcpListener, ws_tx: mpsc::Sender<WsMsg>) -> Result<()> {
    listener
        .set_nonblocking(true)
        .context("failed to configure reload listener")?;

    std::thread::spawn(move || {
        loop {
            if crate::core::is_shutdown() || ws_tx.is_closed() {
                break;
            }
            match listener.accept() {
                Ok((stream, addr)) => {
                    debug!("reload"; "connection from {}", addr);
                    let tx = ws_tx.clone();
                    std::thread::spawn(move || handshake(stream, &tx));
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    log!("reload"; "accept error: {}", e);
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
        }
    });

    Ok(())
}

fn handshake(stream: TcpStream, tx: &mpsc::Sender<WsMsg>) {
    // accepted sockets may inherit the listener's non-blocking mode
    let _ = stream.set_nonblocking(false);
    let _ = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT));

    let ws = match tungstenite::accept_hdr(stream, only_ws_path) {
        Ok(ws) => ws,
        Err(e) => {
            debug!("reload"; "handshake rejected: {}", e);
            return;
        }
    };
    let _ = ws.get_ref().set_read_timeout(None);

    match attach(ws, tx) {
        Ok(id) => debug!("reload"; "client {} attached", id),
        Err(e) => log!("reload"; "failed to attach client: {}", e),
    }
}

/// Reject upgrades on anything but [`WS_PATH`] with 404.
#[allow(clippy::result_large_err)]
fn only_ws_path(request: &Request, response: Response) -> Result<Response, ErrorResponse> {
    if request.uri().path() == WS_PATH {
        return Ok(response);
    }
    let mut rejection = ErrorResponse::new(Some("404 Not Found".to_string()));
    *rejection.status_mut() = StatusCode::NOT_FOUND;
    Err(rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tungstenite::Message;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_bind_retries_busy_port() {
        let (first, port) = bind(LOCALHOST, 0).unwrap();
        let (_second, next) = bind(LOCALHOST, port).unwrap();
        assert_ne!(port, next);
        drop(first);
    }

    #[test]
    fn test_client_lifecycle() {
        let (listener, port) = bind(LOCALHOST, 0).unwrap();
        let (tx, mut rx) = mpsc::channel(8);
        start(listener, tx).unwrap();

        let (mut client, _) = tungstenite::connect(format!("ws://127.0.0.1:{port}/ws")).unwrap();

        let Some(WsMsg::AddClient { id, mut sink }) = rx.blocking_recv() else {
            panic!("expected AddClient");
        };
        sink.send_text("reload").unwrap();
        assert_eq!(client.read().unwrap(), Message::text("reload".to_string()));

        client.close(None).unwrap();
        drop(client);

        match rx.blocking_recv() {
            Some(WsMsg::RemoveClient(removed)) => assert_eq!(removed, id),
            other => panic!("expected RemoveClient, got {other:?}"),
        }
    }

    #[test]
    fn test_only_the_sink_writes_frames() {
        let (listener, port) = bind(LOCALHOST, 0).unwrap();
        let (tx, mut rx) = mpsc::channel(8);
        start(listener, tx).unwrap();

        let (mut client, _) = tungstenite::connect(format!("ws://127.0.0.1:{port}/ws")).unwrap();
        let Some(WsMsg::AddClient { mut sink, .. }) = rx.blocking_recv() else {
            panic!("expected AddClient");
        };

        client.send(Message::Ping("hi".into())).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        sink.send_text("reload").unwrap();

        // no pong from the read half lands before the reload frame
        assert_eq!(client.read().unwrap(), Message::text("reload".to_string()));
    }

    #[test]
    fn test_other_paths_rejected_with_404() {
        let (listener, port) = bind(LOCALHOST, 0).unwrap();
        let (tx, _rx) = mpsc::channel(8);
        start(listener, tx).unwrap();

        match tungstenite::connect(format!("ws://127.0.0.1:{port}/other")) {
            Err(tungstenite::Error::Http(response)) => {
                assert_eq!(response.status(), StatusCode::NOT_FOUND)
            }
            other => panic!("expected 404, got {:?}", other.map(|_| ())),
        }
    }
}
