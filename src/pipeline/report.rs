//! What a build produced and what went wrong along the way.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Errors that abort a build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Stage a non-fatal issue came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Record,
    Template,
    Asset,
    Feed,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Record => "record",
            Self::Template => "template",
            Self::Asset => "asset",
            Self::Feed => "feed",
        })
    }
}

/// A problem that skipped one record, page or asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildIssue {
    pub kind: IssueKind,
    /// Offending source file or template.
    pub subject: String,
    pub message: String,
}

impl BuildIssue {
    pub fn new(kind: IssueKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for BuildIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.subject, self.message)
    }
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub records: usize,
    pub pages: usize,
    pub assets: usize,
    /// Total artifacts written, generated files included.
    pub artifacts: usize,
    /// Paths written more than once in this build; the last write won.
    pub overwritten: Vec<String>,
    pub issues: Vec<BuildIssue>,
    /// blake3 over every artifact, see [`fingerprint`].
    pub fingerprint: String,
    pub duration: Duration,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.overwritten.is_empty()
    }

    /// One-line summary for the status display.
    pub fn summary(&self) -> String {
        use crate::utils::plural_count;

        let mut summary = format!(
            "{}, {}, {} in {}ms",
            plural_count(self.records, "post"),
            plural_count(self.pages, "page"),
            plural_count(self.assets, "asset"),
            self.duration.as_millis()
        );
        if !self.issues.is_empty() {
            summary.push_str(&format!(", {}", plural_count(self.issues.len(), "issue")));
        }
        summary
    }

    /// Issues and overwrites, one per line.
    pub fn details(&self) -> String {
        self.overwritten
            .iter()
            .map(|path| format!("[overwrite] {path}: written by more than one record"))
            .chain(self.issues.iter().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content fingerprint: blake3 over every path and its bytes, in path order.
///
/// Lengths are hashed too so `("a", "bc")` and `("ab", "c")` differ.
pub fn fingerprint(artifacts: &BTreeMap<String, Vec<u8>>) -> String {
    let mut hasher = blake3::Hasher::new();
    for (path, bytes) in artifacts {
        hasher.update(&(path.len() as u64).to_le_bytes());
        hasher.update(path.as_bytes());
        hasher.update(&(bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }
    hex::encode(hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, Vec<u8>> {
        entries
            .iter()
            .map(|(p, b)| (p.to_string(), b.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn test_fingerprint_stable_and_sensitive() {
        let a = fingerprint(&map(&[("public/a", "1"), ("public/b", "2")]));
        let b = fingerprint(&map(&[("public/b", "2"), ("public/a", "1")]));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let c = fingerprint(&map(&[("public/a", "1"), ("public/b", "3")]));
        assert_ne!(a, c);

        let split1 = fingerprint(&map(&[("a", "bc")]));
        let split2 = fingerprint(&map(&[("ab", "c")]));
        assert_ne!(split1, split2);
    }

    #[test]
    fn test_summary_and_details() {
        let report = BuildReport {
            records: 1,
            pages: 2,
            assets: 0,
            overwritten: vec!["public/post/a/index.html".into()],
            issues: vec![BuildIssue::new(IssueKind::Record, "content/x.yaml", "bad yaml")],
            duration: Duration::from_millis(12),
            ..Default::default()
        };
        assert_eq!(report.summary(), "1 post, 2 pages, 0 assets in 12ms, 1 issue");
        assert!(!report.is_clean());
        let details = report.details();
        assert!(details.contains("[overwrite] public/post/a/index.html"));
        assert!(details.contains("[record] content/x.yaml: bad yaml"));
    }
}
