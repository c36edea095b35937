//! URL to store path resolution.

use percent_encoding::percent_decode_str;

use crate::store::{OutputStore, join};

/// Resolve a request URL to a file in `store` below `output_root`.
///
/// Directories resolve to their `index.html`. Anything that would leave the
/// output root, or does not exist, is `None`.
pub fn resolve_path(url: &str, output_root: &str, store: &dyn OutputStore) -> Option<String> {
    let clean = normalize_url(url)?;
    let path = join(output_root, &clean);

    if store.is_dir(&path) {
        let index = join(&path, "index.html");
        return store.exists(&index).then_some(index);
    }
    (store.exists(&path) && !store.is_dir(&path)).then_some(path)
}

/// Decode, strip query and fragment, trim slashes. `..` segments are refused.
fn normalize_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.split(['/', '\\']).any(|seg| seg == "..") {
        return None;
    }
    Some(decoded.trim_matches('/').to_string())
}
