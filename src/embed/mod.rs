//! Embedded static resources.
//!
//! - `serve` - the live-reload client injected into dev builds
//!
//! ```ignore
//! use embed::serve::{LIVERELOAD_JS, LivereloadVars};
//! let js = LIVERELOAD_JS.render(&LivereloadVars { ws_port: 35729 });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for livereload.js.
    pub struct LivereloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for LivereloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__FOLIO_WS_PORT__", &self.ws_port.to_string())
        }
    }

    /// Live-reload client, minified by the build script.
    pub const LIVERELOAD_JS: Template<LivereloadVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/livereload.min.js")));

    /// The client wrapped in a `<script>` element, ready to inject.
    pub fn livereload_script(ws_port: u16) -> String {
        let js = LIVERELOAD_JS.render(&LivereloadVars { ws_port });
        format!("<script>{js}</script>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_livereload_js_with_vars() {
        let rendered = serve::LIVERELOAD_JS.render(&serve::LivereloadVars { ws_port: 35730 });
        assert!(rendered.contains("35730"));
        assert!(!rendered.contains("__FOLIO_WS_PORT__"));
        assert!(rendered.contains("reload"));
    }

    #[test]
    fn test_livereload_script_tag() {
        let script = serve::livereload_script(35729);
        assert!(script.starts_with("<script>"));
        assert!(script.ends_with("</script>"));
        assert!(!script[8..script.len() - 9].contains("</script>"));
    }
}
