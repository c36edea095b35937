//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Normalize a configured base URL so it always ends with `/`.
///
/// An empty value means the site is served from the domain root.
pub fn normalize_base_url(base: &str) -> String {
    let base = base.trim();
    if base.is_empty() {
        return "/".to_string();
    }
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

/// Check that a base URL is either absolute (`https://host/path/`) or
/// root-relative (`/blog/`).
pub fn is_valid_base_url(base: &str) -> bool {
    base.starts_with('/') || url::Url::parse(base).is_ok_and(|u| u.has_host())
}

/// Join a site-relative link onto the base URL.
///
/// Uses `url` for absolute bases so that `https://example.com/blog/` +
/// `post/a/` resolves to `https://example.com/blog/post/a/`. Root-relative
/// bases are joined textually.
///
/// # Examples
/// ```ignore
/// join_url("https://example.com/", "post/a/")    -> "https://example.com/post/a/"
/// join_url("https://example.com/blog", "post/a/") -> "https://example.com/blog/post/a/"
/// join_url("/", "post/a/")                        -> "/post/a/"
/// ```
pub fn join_url(base: &str, link: &str) -> String {
    let base = normalize_base_url(base);
    let link = link.trim_start_matches('/');
    match url::Url::parse(&base).and_then(|u| u.join(link)) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{base}{link}"),
    }
}

/// Whether two normalized logical paths are equal or one contains the other.
///
/// The empty path is the project root and contains everything.
pub fn paths_overlap(a: &str, b: &str) -> bool {
    let within = |inner: &str, outer: &str| {
        outer.is_empty()
            || inner == outer
            || inner
                .strip_prefix(outer)
                .is_some_and(|rest| rest.starts_with('/'))
    };
    within(a, b) || within(b, a)
}

/// Find config file by searching upward from `start`.
///
/// ```text
/// /home/user/site/content/     ← start
/// /home/user/site/config.yaml  ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}
