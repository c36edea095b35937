//! Build orchestrator.
//!
//! One build is a pure function of the project directory:
//!
//! ```text
//! config ──► records ──► templates ──► posts ─┐
//!                                      pages ─┤
//!                                     assets ─┼──► artifacts ──► store.write_batch
//!                          sitemap/feed (prod)┘        │
//!                         reload script (dev) ◄────────┘
//! ```
//!
//! Only a bad config aborts the build, and it does so before the store is
//! touched. Broken records, templates and assets are collected as issues
//! while everything else is still produced.

mod assets;
mod inject;
mod report;

pub use inject::inject_livereload;
pub use report::{BuildError, BuildIssue, BuildReport, IssueKind, fingerprint};

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::compiler::{CompileError, POST_TEMPLATE, PageCompiler};
use crate::config::SiteConfig;
use crate::content::{Post, load_records};
use crate::core::{BuildMode, Project};
use crate::embed::serve::livereload_script;
use crate::generator::{self, minify_xml};
use crate::store::{OutputArtifact, OutputStore, join};
use crate::utils::error_chain;
use crate::{debug, log};

// =============================================================================
// Template payloads
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SitePayload<'a> {
    title: &'a str,
    base_url: &'a str,
    user_url: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeaturesPayload {
    section_post: bool,
    limit_of_post: usize,
    pinned: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PagePayload<'a> {
    site: &'a SitePayload<'a>,
    base_url: &'a str,
    posts: &'a [Post],
    latest: &'a [Post],
    pinned: Vec<&'a Post>,
    features: &'a FeaturesPayload,
    dev: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostPayload<'a> {
    site: &'a SitePayload<'a>,
    base_url: &'a str,
    post: &'a Post,
    features: &'a FeaturesPayload,
    dev: bool,
}

/// Artifacts of one build, keyed by store path.
///
/// A second insert at the same path wins and is remembered as an overwrite.
#[derive(Default)]
struct ArtifactSet {
    files: BTreeMap<String, Vec<u8>>,
    overwritten: Vec<String>,
}

impl ArtifactSet {
    fn insert(&mut self, path: String, bytes: Vec<u8>) {
        if self.files.contains_key(&path) {
            debug!("build"; "{} written twice, keeping the last", path);
            self.overwritten.push(path.clone());
        }
        self.files.insert(path, bytes);
    }
}

// =============================================================================
// Build
// =============================================================================

/// Run one full build of `project` into `store`.
pub fn run_build(
    project: &Project,
    store: &dyn OutputStore,
    mode: BuildMode,
) -> Result<BuildReport, BuildError> {
    let started = Instant::now();

    let mut config = project.load_config()?;
    if mode.is_dev() {
        config.apply_dev_mode();
    }
    debug!("build"; "{} build of {}", mode.label(), config.root.display());

    let mut report = BuildReport::default();
    let files = compile_site(&config, mode, &mut report);

    report.fingerprint = fingerprint(&files.files);
    report.artifacts = files.files.len();
    report.overwritten = files.overwritten;

    if !mode.is_dev() {
        store.remove_all(&config.build.output)?;
    }
    store.write_batch(
        files
            .files
            .into_iter()
            .map(|(path, bytes)| OutputArtifact::new(path, bytes))
            .collect(),
    )?;

    report.duration = started.elapsed();
    Ok(report)
}

/// Produce every artifact of the site in memory.
fn compile_site(config: &SiteConfig, mode: BuildMode, report: &mut BuildReport) -> ArtifactSet {
    let output = config.build.output.as_str();
    let dev = mode.is_dev();
    let mut files = ArtifactSet::default();

    let loaded = load_records(config);
    report.issues.extend(loaded.errors.iter().map(|e| {
        let subject = config.root_relative(e.path()).display().to_string();
        BuildIssue::new(IssueKind::Record, subject, error_chain(e))
    }));
    let posts = loaded.posts;
    report.records = posts.len();

    let (compiler, template_errors) = PageCompiler::load(config);
    report.issues.extend(template_errors.iter().map(template_issue));

    let site = SitePayload {
        title: &config.site_title,
        base_url: &config.base_url,
        user_url: &config.user_url,
        email: &config.email,
    };
    let features = FeaturesPayload {
        section_post: config.use_section_post.active,
        limit_of_post: config.use_section_post.limit_of_post,
        pinned: config.use_pinned.active,
    };

    // Posts
    if compiler.has_template(POST_TEMPLATE) {
        let rendered: Vec<_> = posts
            .par_iter()
            .map(|post| {
                let payload = PostPayload {
                    site: &site,
                    base_url: &config.base_url,
                    post,
                    features: &features,
                    dev,
                };
                (post.output_path(output), compiler.render(POST_TEMPLATE, &payload))
            })
            .collect();
        for (path, result) in rendered {
            match result {
                Ok(html) => files.insert(path, html.into_bytes()),
                Err(e) => report.issues.push(template_issue(&e)),
            }
        }
    } else if !posts.is_empty() {
        report.issues.push(BuildIssue::new(
            IssueKind::Template,
            POST_TEMPLATE,
            format!("missing, {} not rendered", crate::utils::plural_count(posts.len(), "post")),
        ));
    }

    // Pages
    let latest = &posts[..posts.len().min(config.use_section_post.limit_of_post)];
    let page_payload = PagePayload {
        site: &site,
        base_url: &config.base_url,
        posts: &posts,
        latest,
        pinned: posts.iter().filter(|p| p.pinned).collect(),
        features: &features,
        dev,
    };
    let rendered: Vec<_> = compiler
        .pages()
        .par_iter()
        .map(|name| {
            (
                PageCompiler::page_output_path(output, name),
                compiler.render(name, &page_payload),
            )
        })
        .collect();
    for (path, result) in rendered {
        match result {
            Ok(html) => {
                files.insert(path, html.into_bytes());
                report.pages += 1;
            }
            Err(e) => report.issues.push(template_issue(&e)),
        }
    }

    // Assets
    let collected = assets::collect(config, !dev && config.build.minify);
    report.assets = collected.artifacts.len();
    report.issues.extend(collected.issues);
    for artifact in collected.artifacts {
        files.insert(artifact.path, artifact.bytes);
    }

    if !dev {
        generate_extras(config, &compiler, &posts, &mut files, report);
    } else if let Some(ws_port) = mode.ws_port() {
        let script = livereload_script(ws_port);
        for (path, bytes) in files.files.iter_mut() {
            if path.ends_with(".html") {
                *bytes = inject_livereload(bytes, &script);
            }
        }
    }

    files
}

/// `sitemap.xml` and `feed.xml`, production only.
fn generate_extras(
    config: &SiteConfig,
    compiler: &PageCompiler,
    posts: &[Post],
    files: &mut ArtifactSet,
    report: &mut BuildReport,
) {
    let output = config.build.output.as_str();
    let minify = config.build.minify;

    if config.build.sitemap {
        let pages: Vec<String> = compiler
            .pages()
            .iter()
            .map(|name| page_link(name))
            .collect();
        let xml = generator::sitemap::render(config, &pages, posts);
        files.insert(
            join(output, "sitemap.xml"),
            minify_xml(xml.as_bytes(), minify).into_owned(),
        );
    }

    if config.build.feed {
        match generator::feed::render(config, posts) {
            Ok(xml) => files.insert(
                join(output, "feed.xml"),
                minify_xml(xml.as_bytes(), minify).into_owned(),
            ),
            Err(e) => {
                log!("feed"; "skipped: {}", e);
                report
                    .issues
                    .push(BuildIssue::new(IssueKind::Feed, "feed.xml", e.to_string()));
            }
        }
    }
}

/// Site-relative link of a page template: `""` for the index, `name/` otherwise.
fn page_link(name: &str) -> String {
    let stem = name
        .strip_prefix("pages/")
        .unwrap_or(name)
        .trim_end_matches(".html");
    match stem {
        "home" | "index" => String::new(),
        stem => format!("{stem}/"),
    }
}

fn template_issue(e: &CompileError) -> BuildIssue {
    BuildIssue::new(IssueKind::Template, e.subject(), error_chain(e))
}
