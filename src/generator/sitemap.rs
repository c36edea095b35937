//! Sitemap generation.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/post/hello/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use std::borrow::Cow;

use crate::config::SiteConfig;
use crate::content::Post;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

/// Render `sitemap.xml` for the standalone pages and every post.
///
/// `pages` are site-relative links (`""` for the index, `about/`, ...).
pub fn render(config: &SiteConfig, pages: &[String], posts: &[Post]) -> String {
    let urls = pages
        .iter()
        .map(|link| UrlEntry {
            loc: config.full_url(link),
            lastmod: None,
        })
        .chain(posts.iter().map(|post| UrlEntry {
            loc: post.full_link.clone(),
            lastmod: post.parsed_date.map(|d| d.to_ymd()),
        }));
    into_xml(urls)
}

fn into_xml(urls: impl Iterator<Item = UrlEntry>) -> String {
    let mut xml = String::with_capacity(4096);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in urls {
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&entry.loc));
        xml.push_str("</loc>\n");
        if let Some(lastmod) = entry.lastmod {
            xml.push_str("    <lastmod>");
            xml.push_str(&lastmod);
            xml.push_str("</lastmod>\n");
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
