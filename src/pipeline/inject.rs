//! Live-reload script injection for development builds.

/// Insert `script` before the last `</body>` (any case), or append it when
/// the document has no closing body tag.
pub fn inject_livereload(content: &[u8], script: &str) -> Vec<u8> {
    const PATTERN: &[u8] = b"</body>";

    let script = script.as_bytes();
    let mut result = Vec::with_capacity(content.len() + script.len());

    match content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        Some(pos) => {
            result.extend_from_slice(&content[..pos]);
            result.extend_from_slice(script);
            result.extend_from_slice(&content[pos..]);
        }
        None => {
            result.extend_from_slice(content);
            result.extend_from_slice(script);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "<script>r()</script>";

    #[test]
    fn test_inject_before_body() {
        let out = inject_livereload(b"<html><body><p>x</p></body></html>", SCRIPT);
        assert_eq!(
            out,
            b"<html><body><p>x</p><script>r()</script></body></html>"
        );
    }

    #[test]
    fn test_inject_uses_last_body_case_insensitive() {
        let html = b"<body><pre>&lt;/body&gt; </body></pre></BODY>";
        let out = String::from_utf8(inject_livereload(html, SCRIPT)).unwrap();
        assert!(out.ends_with("<script>r()</script></BODY>"));
        assert_eq!(out.matches(SCRIPT).count(), 1);
    }

    #[test]
    fn test_missing_body_appends() {
        let out = inject_livereload(b"<p>fragment</p>", SCRIPT);
        assert_eq!(out, b"<p>fragment</p><script>r()</script>");

        let out = inject_livereload(b"", SCRIPT);
        assert_eq!(out, SCRIPT.as_bytes());
    }
}
