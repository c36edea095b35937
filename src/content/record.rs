//! A single post record: one YAML file under `content/`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use pulldown_cmark::{Options, Parser, html};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::slug::slugify;
use crate::config::SiteConfig;
use crate::utils::date::DateTimeUtc;

#[derive(Debug, Error)]
pub enum ContentRecordError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{0}` is not a valid post record")]
    Yaml(PathBuf, #[source] serde_yaml::Error),
}

impl ContentRecordError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io(path, _) | Self::Yaml(path, _) => path,
        }
    }
}

/// Fields as written in the YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPost {
    title: Option<String>,
    date: Option<String>,
    author: String,
    body: String,
    description: String,
    email: Option<String>,
    #[serde(alias = "fijado")]
    pinned: bool,
}

/// A post ready for templating.
///
/// `slug`, `link`, `full_link` and `body_html` are derived for each build
/// and never written back to the source file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    pub date: String,
    pub author: String,
    pub body: String,
    pub body_html: String,
    pub description: String,
    pub email: String,
    pub pinned: bool,
    pub slug: String,
    /// Site-relative link, `post/<slug>/`.
    pub link: String,
    pub full_link: String,

    /// Source file name, the last ordering key.
    #[serde(skip)]
    pub file_name: String,

    #[serde(skip)]
    pub parsed_date: Option<DateTimeUtc>,
}

impl Post {
    /// Read and derive a record from `path`.
    pub fn load(path: &Path, config: &SiteConfig) -> Result<Self, ContentRecordError> {
        let content =
            fs::read_to_string(path).map_err(|e| ContentRecordError::Io(path.to_path_buf(), e))?;
        let raw: RawPost = if content.trim().is_empty() {
            RawPost::default()
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| ContentRecordError::Yaml(path.to_path_buf(), e))?
        };

        let mtime = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| DateTimeUtc::from_unix_secs(d.as_secs()));

        Ok(Self::derive(raw, path, mtime, config))
    }

    fn derive(
        raw: RawPost,
        path: &Path,
        mtime: Option<DateTimeUtc>,
        config: &SiteConfig,
    ) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| stem.clone());

        let (date, parsed_date) = match raw.date.filter(|d| !d.trim().is_empty()) {
            Some(date) => {
                let parsed = DateTimeUtc::parse(&date);
                (date, parsed)
            }
            None => match mtime {
                Some(mtime) => (mtime.to_dmy(), Some(mtime)),
                None => (String::new(), None),
            },
        };

        let slug = match slugify(&title) {
            slug if slug.is_empty() => slugify(&stem),
            slug => slug,
        };
        let link = format!("post/{slug}/");
        let full_link = config.full_url(&link);

        Self {
            body_html: render_markdown(&raw.body),
            email: raw
                .email
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| config.email.clone()),
            title,
            date,
            author: raw.author,
            body: raw.body,
            description: raw.description,
            pinned: raw.pinned,
            slug,
            link,
            full_link,
            file_name,
            parsed_date,
        }
    }

    /// Store path of the compiled post below the output root.
    pub fn output_path(&self, output_root: &str) -> String {
        crate::store::join(output_root, &format!("{}index.html", self.link))
    }
}

fn render_markdown(body: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(body, opts));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use tempfile::TempDir;

    fn config() -> SiteConfig {
        test_parse_config("baseUrl: https://example.com/\nemail: site@example.com")
    }

    #[test]
    fn test_load_full_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("first.yaml");
        fs::write(
            &path,
            "title: Hello World!\ndate: 2024-06-15\nauthor: Ana\nbody: \"*hi*\"\ndescription: intro\nfijado: true\n",
        )
        .unwrap();

        let post = Post::load(&path, &config()).unwrap();
        assert_eq!(post.title, "Hello World!");
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.link, "post/hello-world/");
        assert_eq!(post.full_link, "https://example.com/post/hello-world/");
        assert_eq!(post.body_html.trim(), "<p><em>hi</em></p>");
        assert_eq!(post.email, "site@example.com");
        assert!(post.pinned);
        assert_eq!(post.parsed_date, Some(DateTimeUtc::from_ymd(2024, 6, 15)));
        assert_eq!(post.output_path("public"), "public/post/hello-world/index.html");
    }

    #[test]
    fn test_missing_title_and_date_fall_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes-on-rust.yaml");
        fs::write(&path, "body: text\n").unwrap();

        let post = Post::load(&path, &config()).unwrap();
        assert_eq!(post.title, "notes-on-rust");
        assert_eq!(post.slug, "notes-on-rust");
        // mtime fallback, DD-MM-YYYY
        assert_eq!(post.date.len(), 10);
        assert!(DateTimeUtc::parse(&post.date).is_some());
        assert!(post.parsed_date.is_some());
        assert_eq!(fs::read_to_string(&path).unwrap(), "body: text\n");
    }

    #[test]
    fn test_unsluggable_title_uses_stem() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bang.yaml");
        fs::write(&path, "title: \"!!!\"\n").unwrap();

        let post = Post::load(&path, &config()).unwrap();
        assert_eq!(post.title, "!!!");
        assert_eq!(post.slug, "bang");
    }

    #[test]
    fn test_unparseable_date_is_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.yaml");
        fs::write(&path, "title: A\ndate: someday\nemail: me@a.org\n").unwrap();

        let post = Post::load(&path, &config()).unwrap();
        assert_eq!(post.date, "someday");
        assert_eq!(post.parsed_date, None);
        assert_eq!(post.email, "me@a.org");
    }

    #[test]
    fn test_malformed_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "title: [unclosed\n").unwrap();

        let err = Post::load(&path, &config()).unwrap_err();
        assert!(matches!(err, ContentRecordError::Yaml(..)));
        assert_eq!(err.path(), path);
    }

    #[test]
    fn test_serialized_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.yaml");
        fs::write(&path, "title: A\ndate: 01-02-2024\n").unwrap();

        let post = Post::load(&path, &config()).unwrap();
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["fullLink"], "https://example.com/post/a/");
        assert_eq!(value["bodyHtml"], "");
        assert!(value.get("fileName").is_none());
    }
}
