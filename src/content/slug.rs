//! URL slugs for post titles.

use std::sync::LazyLock;

use deunicode::deunicode;
use regex::Regex;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new("[^a-z0-9]+").unwrap());

/// Lowercase ASCII slug: transliterate, collapse every run of characters
/// outside `[a-z0-9]` into one `-`, trim dashes.
///
/// Returns an empty string when nothing survives (`"¡!"`, `"   "`).
pub fn slugify(s: &str) -> String {
    let ascii = deunicode(s).to_lowercase();
    NON_ALNUM
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World!"), "hello-world");
        assert_eq!(slugify("  Rust -- 2024 edition "), "rust-2024-edition");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Año nuevo, código nuevo"), "ano-nuevo-codigo-nuevo");
        assert_eq!(slugify("Ünïcödé"), "unicode");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("¡!?"), "");
        assert_eq!(slugify(""), "");
    }
}
