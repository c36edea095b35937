//! Auxiliary production artifacts generated from the post list:
//!
//! - **Feed**: RSS 2.0 for blog readers (`feed.xml`)
//! - **Sitemap**: search engine indexing (`sitemap.xml`)
//!
//! Both return bytes; the orchestrator decides where they land.

pub mod feed;
pub mod sitemap;

use std::borrow::Cow;

/// Minify XML content if enabled.
pub fn minify_xml(content: &[u8], enabled: bool) -> Cow<'_, [u8]> {
    if !enabled {
        return Cow::Borrowed(content);
    }
    let Ok(xml_str) = std::str::from_utf8(content) else {
        return Cow::Borrowed(content);
    };
    let minified = xml_str
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<String>();
    Cow::Owned(minified.into_bytes())
}
