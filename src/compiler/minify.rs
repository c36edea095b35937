//! Output minification.
//!
//! - HTML: minify-html, configured to keep closing tags.
//! - JS: oxc. CSS: lightningcss. Both return `None` on parse failure so the
//!   caller can fall back to the original bytes.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// Minify a rendered page.
///
/// Closing tags are kept so the live-reload script can still find `</body>`.
/// Output that is not valid UTF-8 falls back to the input.
pub fn minify_page(html: String) -> String {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;

    let minified = minify_html::minify(html.as_bytes(), &cfg);
    String::from_utf8(minified).unwrap_or(html)
}

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::mjs()).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Option<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(result.code)
}

/// Minify a static asset by extension. `None` means "copy verbatim".
pub fn minify_asset(path: &str, bytes: &[u8]) -> Option<Vec<u8>> {
    let (_, ext) = path.rsplit_once('.')?;
    let source = std::str::from_utf8(bytes).ok()?;
    let minified = match ext {
        "js" | "mjs" => minify_js(source)?,
        "css" => minify_css(source)?,
        _ => return None,
    };
    Some(minified.into_bytes())
}
