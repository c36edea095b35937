//! Actor Coordinator - wires up the serve-mode actor system.
//!
//! The Coordinator is a thin orchestrator that:
//! - creates the WebSocket channel
//! - starts the reload listener and hands it the channel
//! - builds the rebuild callback around the shared memory store
//! - runs the actors until shutdown

mod runtime;

use std::net::TcpListener;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::fs::{FsActor, RebuildFn};
use super::messages::WsMsg;
use super::ws::WsActor;
use crate::core::{BuildMode, Project};
use crate::logger;
use crate::pipeline::{BuildError, BuildReport, run_build};
use crate::store::MemoryStore;
use crate::utils::error_chain;

const CHANNEL_BUFFER: usize = 32;

/// Coordinator - wires up and runs the actor system.
pub struct Coordinator {
    project: Project,
    store: Arc<MemoryStore>,
    reload: Option<(TcpListener, u16)>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn new(project: Project, store: Arc<MemoryStore>) -> Self {
        Self {
            project,
            store,
            reload: None,
            shutdown_rx: None,
        }
    }

    /// Use an already bound reload listener. Without one nothing is watched.
    pub fn with_reload_listener(mut self, listener: TcpListener, port: u16) -> Self {
        self.reload = Some((listener, port));
        self
    }

    /// Set shutdown signal receiver.
    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system.
    pub async fn run(mut self) -> Result<()> {
        let Some((listener, ws_port)) = self.reload.take() else {
            crate::debug!("actor"; "watch disabled, nothing to run");
            return Ok(());
        };

        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);
        crate::reload::start(listener, ws_tx.clone())?;

        // watch paths come from the config as it was at startup
        let config = self
            .project
            .load_config()
            .context("failed to load config for watching")?;
        let rebuild = rebuilder(
            self.project.clone(),
            Arc::clone(&self.store),
            BuildMode::Development {
                ws_port: Some(ws_port),
            },
        );
        let fs_actor = FsActor::new(config.watch_paths(), rebuild, ws_tx.clone())
            .map_err(|e| anyhow::anyhow!("watcher failed: {}", e))?;
        let ws_actor = WsActor::new(ws_rx);

        crate::debug!("actor"; "start");
        runtime::run_actors(fs_actor, ws_actor, ws_tx, self.shutdown_rx.take()).await;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

/// Rebuild callback for the watcher: one dev build into `store`, reported on
/// the status line.
fn rebuilder(project: Project, store: Arc<MemoryStore>, mode: BuildMode) -> RebuildFn {
    Arc::new(move || {
        report_build(&run_build(&project, store.as_ref(), mode));
    })
}

/// Show a build result on the serve status line.
///
/// The previous snapshot stays in the store when a build fails, so the
/// browser keeps the last good site.
pub fn report_build(result: &Result<BuildReport, BuildError>) {
    match result {
        Ok(report) if report.is_clean() => {
            logger::status_success(&format!("rebuilt: {}", report.summary()));
        }
        Ok(report) => {
            logger::status_warning(&format!("rebuilt: {}\n{}", report.summary(), report.details()));
        }
        Err(e) => {
            logger::status_error("build failed, serving previous build", &error_chain(e));
        }
    }
}
