//! Page compiler: templates in, HTML out.
//!
//! Templates are registered under fixed names regardless of where the
//! configured directories live:
//!
//! ```text
//! layout/index.html       <- <build.layout>/index.html
//! components/nav.html     <- <build.components>/nav.html
//! pages/post.html         <- <build.pages>/post.html   (one per record)
//! pages/home.html         <- <build.pages>/home.html   (public/index.html)
//! pages/about.html        <- <build.pages>/about.html  (public/about/index.html)
//! ```
//!
//! The compiler is stateless between builds: the orchestrator creates a new
//! one for every build so template edits are always picked up.

pub mod minify;

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::config::SiteConfig;

/// Template rendered once per post record.
pub const POST_TEMPLATE: &str = "pages/post.html";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("template `{name}` failed")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("template `{0}` not found")]
    Missing(String),
}

impl CompileError {
    /// Template name or file the error refers to.
    pub fn subject(&self) -> String {
        match self {
            Self::Io(path, _) => path.display().to_string(),
            Self::Template { name, .. } | Self::Missing(name) => name.clone(),
        }
    }
}

pub struct PageCompiler {
    env: Environment<'static>,
    /// Page templates other than the post template, sorted.
    pages: Vec<String>,
    minify: bool,
}

impl PageCompiler {
    /// Register every template of the project.
    ///
    /// A template that cannot be read or parsed is reported and left out;
    /// pages depending on it then fail individually at render time.
    pub fn load(config: &SiteConfig) -> (Self, Vec<CompileError>) {
        let mut env = Environment::new();
        let mut errors = Vec::new();
        let mut pages = Vec::new();

        let dirs = [
            ("layout", &config.build.layout),
            ("components", &config.build.components),
            ("pages", &config.build.pages),
        ];
        for (prefix, dir) in dirs {
            for path in html_files(&config.root_join(dir), &mut errors) {
                let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned())
                else {
                    continue;
                };
                let name = format!("{prefix}/{file_name}");
                let source = match fs::read_to_string(&path) {
                    Ok(source) => source,
                    Err(e) => {
                        errors.push(CompileError::Io(path, e));
                        continue;
                    }
                };
                if let Err(source) = env.add_template_owned(name.clone(), source) {
                    errors.push(CompileError::Template { name, source });
                    continue;
                }
                if prefix == "pages" && name != POST_TEMPLATE {
                    pages.push(name);
                }
            }
        }

        pages.sort();
        let compiler = Self {
            env,
            pages,
            minify: config.build.minify,
        };
        (compiler, errors)
    }

    /// Names of the standalone page templates (`pages/*.html` minus the post template).
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Render `name` with `ctx`, minifying when enabled.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, CompileError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|_| CompileError::Missing(name.to_string()))?;
        let html = template
            .render(ctx)
            .map_err(|source| CompileError::Template {
                name: name.to_string(),
                source,
            })?;
        Ok(if self.minify {
            minify::minify_page(html)
        } else {
            html
        })
    }

    /// Store path of a page template below the output root.
    ///
    /// `home` and `index` become the site index; anything else gets its own
    /// directory.
    pub fn page_output_path(output_root: &str, name: &str) -> String {
        let stem = name
            .strip_prefix("pages/")
            .unwrap_or(name)
            .trim_end_matches(".html");
        match stem {
            "home" | "index" => crate::store::join(output_root, "index.html"),
            stem => crate::store::join(output_root, &format!("{stem}/index.html")),
        }
    }
}

/// `*.html` files directly inside `dir`, sorted. A missing directory is empty.
fn html_files(dir: &Path, errors: &mut Vec<CompileError>) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            errors.push(CompileError::Io(dir.to_path_buf(), e));
            return Vec::new();
        }
    };
    let mut files: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "html"))
        .collect();
    files.sort();
    files
}
