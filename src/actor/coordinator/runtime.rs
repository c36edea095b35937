use std::time::Duration;

use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use crate::actor::fs::FsActor;
use crate::actor::messages::WsMsg;
use crate::actor::ws::WsActor;

/// Run all actors concurrently until shutdown or until one of them stops.
pub(super) async fn run_actors(
    fs: FsActor,
    ws: WsActor,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let fs_handle = tokio::spawn(async move { fs.run().await });
    let mut ws_handle = tokio::spawn(async move { ws.run().await });

    let shutdown = async {
        match shutdown_rx {
            Some(rx) => loop {
                if rx.try_recv().is_ok() {
                    crate::debug!("actor"; "shutdown signal received");
                    break;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            },
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = shutdown => {}
        _ = &mut ws_handle => {
            fs_handle.abort();
            return;
        }
    }

    fs_handle.abort();
    crate::debug!("actor"; "closing reload clients");
    let _ = ws_tx.send(WsMsg::Shutdown).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), ws_handle).await;
}
