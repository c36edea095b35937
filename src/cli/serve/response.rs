//! HTTP responses served from the output store.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use super::path::resolve_path;
use crate::store::{Bytes, OutputStore, join};
use crate::utils::mime::{self, types::PLAIN};

/// Browsers must never keep a dev build.
const CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate";

/// Response decided for one request, independent of the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Bytes,
}

impl Reply {
    fn text(status: u16, body: &'static str) -> Self {
        Self {
            status,
            content_type: PLAIN,
            body: Arc::from(body.as_bytes()),
        }
    }

    pub fn unavailable() -> Self {
        Self::text(503, "503 Service Unavailable")
    }
}

/// Decide the reply for `method url` against the current store snapshot.
pub fn route(method: &Method, url: &str, store: &dyn OutputStore, output_root: &str) -> Reply {
    if !matches!(method, Method::Get | Method::Head) {
        return Reply::text(405, "405 Method Not Allowed");
    }

    // The snapshot can change between resolve and read; a vanished file is a 404.
    if let Some(path) = resolve_path(url, output_root, store)
        && let Ok(body) = store.read(&path)
    {
        return Reply {
            status: 200,
            content_type: mime::from_path(&path),
            body,
        };
    }

    not_found(store, output_root)
}

/// Custom `404.html` from the site when there is one.
fn not_found(store: &dyn OutputStore, output_root: &str) -> Reply {
    match store.read(&join(output_root, "404.html")) {
        Ok(body) => Reply {
            status: 404,
            content_type: mime::types::HTML,
            body,
        },
        Err(_) => Reply::text(404, "404 Not Found"),
    }
}

/// Write `reply` to the client. tiny_http drops the body for `HEAD`.
pub fn send(request: Request, reply: Reply) -> Result<()> {
    let mut headers = vec![
        header("Content-Type", reply.content_type)?,
        header("Cache-Control", CACHE_CONTROL)?,
    ];
    if reply.status == 405 {
        headers.push(header("Allow", "GET, HEAD")?);
    }

    let length = reply.body.len();
    let response = Response::new(
        StatusCode(reply.status),
        headers,
        Cursor::new(reply.body),
        Some(length),
        None,
    );
    request.respond(response)?;
    Ok(())
}

fn header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header `{key}: {value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.write("public/index.html", b"<p>home</p>").unwrap();
        store.write("public/style/site.css", b"body{}").unwrap();
        store
    }

    #[test]
    fn test_get_and_head_serve_store_bytes() {
        let store = store();

        let reply = route(&Method::Get, "/", &store, "public");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, mime::types::HTML);
        assert_eq!(&*reply.body, b"<p>home</p>");

        let reply = route(&Method::Head, "/style/site.css", &store, "public");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, mime::types::CSS);
    }

    #[test]
    fn test_other_methods_not_allowed() {
        let store = store();
        for method in [Method::Post, Method::Put, Method::Delete] {
            assert_eq!(route(&method, "/", &store, "public").status, 405);
        }
    }

    #[test]
    fn test_not_found() {
        let store = store();
        let reply = route(&Method::Get, "/missing/", &store, "public");
        assert_eq!(reply.status, 404);
        assert_eq!(reply.content_type, PLAIN);

        store.write("public/404.html", b"<h1>gone</h1>").unwrap();
        let reply = route(&Method::Get, "/missing/", &store, "public");
        assert_eq!(reply.status, 404);
        assert_eq!(&*reply.body, b"<h1>gone</h1>");
    }

    #[test]
    fn test_reads_follow_latest_snapshot() {
        let store = store();
        store.write("public/index.html", b"<p>v2</p>").unwrap();
        assert_eq!(&*route(&Method::Get, "/", &store, "public").body, b"<p>v2</p>");
    }
}
