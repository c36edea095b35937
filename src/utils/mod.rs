//! Small shared helpers.

pub mod date;
pub mod mime;

/// Format count with noun, handling pluralization.
///
/// `plural_count(1, "post")` -> `"1 post"`, `plural_count(3, "post")` -> `"3 posts"`
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

/// Error and its source chain flattened to one `: `-separated line.
pub fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&err.to_string());
        source = err.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("read failed")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_error_chain() {
        let inner = std::io::Error::other("disk gone");
        assert_eq!(error_chain(&inner), "disk gone");
        assert_eq!(error_chain(&Outer(inner)), "read failed: disk gone");
    }

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "page"), "0 pages");
        assert_eq!(plural_count(1, "page"), "1 page");
        assert_eq!(plural_count(12, "asset"), "12 assets");
    }
}
