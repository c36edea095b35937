//! `folio serve`: development server with live reload.
//!
//! ```text
//! initial dev build ──► MemoryStore ◄── rebuilds (FsActor)
//!                           │
//!        HTTP GET/HEAD ─────┘            reload listener (/ws) ──► WsActor
//! ```
//!
//! The reload listener is bound before the first build so the port baked
//! into the injected script is the one actually listening.

mod lifecycle;
mod path;
mod response;

use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Request, Server};

use crate::actor::Coordinator;
use crate::cli::build::log_report;
use crate::core::{BuildMode, Project, is_shutdown, register_server};
use crate::pipeline::run_build;
use crate::store::{MemoryStore, OutputStore};
use crate::{debug, log, reload};

/// Worker threads answering HTTP requests.
const REQUEST_THREADS: usize = 4;

/// Build into memory, then serve until Ctrl+C.
pub fn serve_site(project: &Project) -> Result<()> {
    let config = project
        .load_config()
        .with_context(|| format!("cannot serve {}", project.config_path().display()))?;

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let reload = if config.serve.watch {
        Some(reload::bind(config.serve.interface, config.serve.ws_port)?)
    } else {
        None
    };
    let ws_port = reload.as_ref().map(|(_, port)| *port);

    let store = Arc::new(MemoryStore::new());
    match run_build(project, store.as_ref(), BuildMode::Development { ws_port }) {
        Ok(report) => log_report(&report),
        Err(e) => log!("build"; "initial build failed: {:#}", anyhow::Error::new(e)),
    }

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_server(Arc::clone(&server), shutdown_tx);

    let actors = reload.map(|(listener, port)| {
        debug!("reload"; "ws://{}:{}{}", config.serve.interface, port, reload::WS_PATH);
        lifecycle::spawn_actors(
            Coordinator::new(project.clone(), Arc::clone(&store))
                .with_reload_listener(listener, port)
                .with_shutdown_signal(shutdown_rx),
        )
    });

    log!("serve"; "http://{}", addr);
    run_request_loop(&server, store, Arc::from(config.build.output.as_str()))?;
    lifecycle::wait_for_shutdown(actors);
    Ok(())
}

/// Answer requests until the server is unblocked.
fn run_request_loop(server: &Server, store: Arc<MemoryStore>, output_root: Arc<str>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let store = Arc::clone(&store);
        let output_root = Arc::clone(&output_root);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, store.as_ref(), &output_root) {
                debug!("serve"; "request error: {}", e);
            }
        });
    }
    Ok(())
}

fn handle_request(request: Request, store: &dyn OutputStore, output_root: &str) -> Result<()> {
    let reply = if is_shutdown() {
        response::Reply::unavailable()
    } else {
        response::route(request.method(), request.url(), store, output_root)
    };
    response::send(request, reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{IpAddr, Ipv4Addr, TcpStream};

    fn fetch(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(request.as_bytes()).unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_request_loop_serves_store() {
        let (server, addr) = lifecycle::bind_with_retry(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
        let server = Arc::new(server);
        let store = Arc::new(MemoryStore::new());
        store.write("public/index.html", b"<p>hi</p>").unwrap();

        let loop_server = Arc::clone(&server);
        let loop_store = Arc::clone(&store);
        let handle = std::thread::spawn(move || {
            run_request_loop(&loop_server, loop_store, Arc::from("public")).unwrap();
        });

        let ok = fetch(addr, "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        assert!(ok.starts_with("HTTP/1.1 200"));
        assert!(ok.contains("Cache-Control: no-cache, no-store, must-revalidate"));
        assert!(ok.ends_with("<p>hi</p>"));

        let missing = fetch(addr, "GET /nope HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        assert!(missing.starts_with("HTTP/1.1 404"));

        let post = fetch(
            addr,
            "POST / HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        assert!(post.starts_with("HTTP/1.1 405"));
        assert!(post.contains("Allow: GET, HEAD"));

        server.unblock();
        handle.join().unwrap();
    }
}
