//! Validation of internal links against the known page set.

use crate::config::{IgnoreDeadLinks, IgnoreKeyword};
use crate::pages::compile_patterns;
use crate::paths::{normalize_path, relative_to, to_slash};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

static SCHEME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^[a-z][a-z0-9+.\-]*:").unwrap());

/// Which reported links are dropped before they reach the result
#[derive(Debug, Clone, Default)]
enum IgnoreRule {
    #[default]
    Nothing,
    Everything,
    Localhost,
    Patterns(Vec<Regex>),
}

impl IgnoreRule {
    fn from_config(config: &IgnoreDeadLinks) -> Self {
        match config {
            IgnoreDeadLinks::Flag(false) => IgnoreRule::Nothing,
            IgnoreDeadLinks::Flag(true) => IgnoreRule::Everything,
            IgnoreDeadLinks::Keyword(IgnoreKeyword::LocalhostLinks) => IgnoreRule::Localhost,
            IgnoreDeadLinks::Patterns(patterns) => {
                IgnoreRule::Patterns(compile_patterns(patterns, "ignore_dead_links"))
            }
        }
    }

    fn ignores(&self, url: &str) -> bool {
        match self {
            IgnoreRule::Nothing => false,
            IgnoreRule::Everything => true,
            IgnoreRule::Localhost => is_localhost(url),
            IgnoreRule::Patterns(patterns) => patterns.iter().any(|re| re.is_match(url)),
        }
    }
}

/// Checks rendered links against known pages and the public directory
#[derive(Debug, Clone)]
pub struct DeadLinkValidator {
    src_dir: PathBuf,
    pages: HashSet<String>,
    ignore: IgnoreRule,
}

impl DeadLinkValidator {
    /// `pages` holds source-relative, extension-less, `/`-separated identifiers
    pub fn new<I>(src_dir: impl Into<PathBuf>, pages: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            src_dir: src_dir.into(),
            pages: pages.into_iter().collect(),
            ignore: IgnoreRule::default(),
        }
    }

    pub fn with_ignore(mut self, config: &IgnoreDeadLinks) -> Self {
        self.ignore = IgnoreRule::from_config(config);
        self
    }

    /// Return the dead subset of `links`, in input order
    ///
    /// `file` is the referencing document; relative links and the public
    /// directory are resolved from its parent directory.
    pub fn validate(&self, links: &[String], file: &Path, public_dir: &Path) -> Vec<String> {
        let dir = file.parent().unwrap_or(self.src_dir.as_path());
        let mut dead = Vec::new();

        for url in links {
            if !self.is_dead(url, dir, public_dir) {
                continue;
            }
            if self.ignore.ignores(url) {
                tracing::debug!(url = %url, file = %file.display(), "ignoring dead link");
                continue;
            }
            tracing::warn!(url = %url, file = %file.display(), "found dead link");
            dead.push(url.clone());
        }

        dead
    }

    fn is_dead(&self, url: &str, dir: &Path, public_dir: &Path) -> bool {
        if has_asset_extension(url) {
            return false;
        }
        if is_localhost(url) {
            return true;
        }

        let resolved = self.resolve_page(url, dir);
        if self.pages.contains(&resolved) {
            return false;
        }

        let asset = dir.join(public_dir).join(format!("{resolved}.html"));
        !asset.exists()
    }

    /// Map a link to the page identifier it points at
    fn resolve_page(&self, url: &str, dir: &Path) -> String {
        let mut target = strip_query(url).to_string();
        if let Some(len) = [".html", ".md"]
            .iter()
            .find_map(|ext| target.strip_suffix(*ext).map(str::len))
        {
            target.truncate(len);
        }
        if target.ends_with('/') {
            target.push_str("index");
        }

        let resolved = match target.strip_prefix('/') {
            Some(rooted) => rooted.to_string(),
            None => {
                let absolute = normalize_path(&dir.join(&target));
                to_slash(&relative_to(&absolute, &self.src_dir))
            }
        };

        match urlencoding::decode(&resolved) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => resolved,
        }
    }
}

/// Cut the first `?` or `#` and everything after it
fn strip_query(url: &str) -> &str {
    url.find(['?', '#']).map_or(url, |idx| &url[..idx])
}

/// True when the last path segment names a non-document file
fn has_asset_extension(url: &str) -> bool {
    let path = strip_query(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = segment.rsplit_once('.') else {
        return false;
    };
    !ext.is_empty()
        && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !ext.eq_ignore_ascii_case("html")
        && !ext.eq_ignore_ascii_case("md")
}

pub(crate) fn is_localhost(url: &str) -> bool {
    SCHEME_RE.replace(url, "").starts_with("//localhost:")
}
