//! Build script for minifying the embedded live-reload client.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::fs;
use std::path::Path;

const LIVERELOAD_JS: &str = "src/embed/serve/livereload.js";

/// Placeholder substituted at render time; must survive minification.
const PORT_PLACEHOLDER: &str = "__FOLIO_WS_PORT__";

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_path = Path::new(&out_dir);

    minify_livereload(LIVERELOAD_JS, &out_path.join("livereload.min.js"));

    println!("cargo:rerun-if-changed={LIVERELOAD_JS}");
}

fn minify_js(source: &str) -> String {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();

    let ret = Parser::new(&allocator, source, source_type).parse();
    assert!(ret.errors.is_empty(), "Parse errors: {:?}", ret.errors);

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);

    Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code
}

fn minify_livereload(input: &str, output: &Path) {
    let source = fs::read_to_string(input).expect("Failed to read livereload.js");
    let code = minify_js(&source);

    // Fall back to the unminified source if the placeholder got folded away.
    let code = if code.contains(PORT_PLACEHOLDER) {
        code
    } else {
        source
    };
    fs::write(output, code).expect("Failed to write minified livereload JS");
}
