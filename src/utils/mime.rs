//! Content-Type lookup for files served from the output store.

/// MIME type constants used by the dev server.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const RSS: &str = "application/rss+xml";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess the MIME type of a logical store path from its extension.
///
/// `feed.xml` is served as RSS so browsers hand it to a feed reader.
pub fn from_path(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path);
    if name == "feed.xml" {
        return types::RSS;
    }
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html" | "htm") => types::HTML,
        Some("css") => types::CSS,
        Some("js" | "mjs") => types::JAVASCRIPT,
        Some("json" | "map") => types::JSON,
        Some("xml") => types::XML,
        Some("txt" | "md") => types::PLAIN,

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("pdf") => "application/pdf",
        Some("wasm") => "application/wasm",

        _ => types::OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(from_path("public/index.html"), types::HTML);
        assert_eq!(from_path("public/style/main.CSS"), types::CSS);
        assert_eq!(from_path("public/assets/app.js"), types::JAVASCRIPT);
        assert_eq!(from_path("public/assets/logo.png"), "image/png");
        assert_eq!(from_path("public/sitemap.xml"), types::XML);
        assert_eq!(from_path("public/feed.xml"), types::RSS);
        assert_eq!(from_path("public/LICENSE"), types::OCTET_STREAM);
        assert_eq!(from_path("public/archive.xyz"), types::OCTET_STREAM);
    }
}
