//! Expansion of `<!-- @include: path -->` directives.

use crate::paths::normalize_path;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};

static INCLUDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*@include:\s*(.*?)\s*-->").unwrap());

/// Prefix that anchors an include path at the source root
const SOURCE_ROOT_PREFIX: &str = "@/";

/// What happened to one include directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeOutcome {
    /// The directive was replaced by the file's contents
    Expanded(PathBuf),
    /// The file could not be read; the directive was kept verbatim
    NotFound(PathBuf),
}

/// Source text after a single expansion pass
#[derive(Debug, Clone)]
pub struct ExpandedSource {
    pub text: String,
    pub outcomes: Vec<IncludeOutcome>,
}

impl ExpandedSource {
    /// Paths of every expanded directive, in occurrence order
    pub fn includes(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                IncludeOutcome::Expanded(path) => Some(path.clone()),
                IncludeOutcome::NotFound(_) => None,
            })
            .collect()
    }
}

/// Replace include directives with the contents of the files they name
///
/// Paths resolve against `base_dir`, or against `src_dir` when prefixed with
/// `@/`. Included text is not scanned again, so nested directives stay as
/// written. An unreadable file leaves its directive in place.
pub fn resolve_includes(source: &str, base_dir: &Path, src_dir: &Path) -> ExpandedSource {
    let mut outcomes = Vec::new();

    let text = INCLUDE_RE.replace_all(source, |caps: &Captures| {
        let target = caps[1].trim();
        let path = match target.strip_prefix(SOURCE_ROOT_PREFIX) {
            Some(rest) => normalize_path(&src_dir.join(rest)),
            None => normalize_path(&base_dir.join(target)),
        };

        match fs::read_to_string(&path) {
            Ok(content) => {
                outcomes.push(IncludeOutcome::Expanded(path));
                content
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "include target not readable");
                outcomes.push(IncludeOutcome::NotFound(path));
                caps[0].to_string()
            }
        }
    });

    ExpandedSource {
        text: text.into_owned(),
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_expands_directive() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("snippet.md"), "Hello").unwrap();

        let expanded = resolve_includes(
            "Before\n<!-- @include: snippet.md -->\nAfter",
            dir.path(),
            dir.path(),
        );

        assert_eq!(expanded.text, "Before\nHello\nAfter");
        assert_eq!(expanded.includes(), vec![dir.path().join("snippet.md")]);
    }

    #[test]
    fn test_missing_target_left_verbatim() {
        let dir = tempdir().unwrap();
        let source = "Text <!-- @include: nope.md --> more";

        let expanded = resolve_includes(source, dir.path(), dir.path());

        assert_eq!(expanded.text, source);
        assert!(expanded.includes().is_empty());
        assert_eq!(
            expanded.outcomes,
            vec![IncludeOutcome::NotFound(dir.path().join("nope.md"))]
        );
    }

    #[test]
    fn test_repeated_directives_keep_every_entry() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "A").unwrap();

        let expanded = resolve_includes(
            "<!-- @include: a.md -->|<!--@include:a.md-->",
            dir.path(),
            dir.path(),
        );

        assert_eq!(expanded.text, "A|A");
        assert_eq!(expanded.includes().len(), 2);
    }

    #[test]
    fn test_nested_directives_not_expanded() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("outer.md"), "<!-- @include: inner.md -->").unwrap();
        fs::write(dir.path().join("inner.md"), "inner").unwrap();

        let expanded = resolve_includes("<!-- @include: outer.md -->", dir.path(), dir.path());

        assert_eq!(expanded.text, "<!-- @include: inner.md -->");
        assert_eq!(expanded.includes(), vec![dir.path().join("outer.md")]);
    }

    #[test]
    fn test_relative_and_root_anchored_paths() {
        let root = tempdir().unwrap();
        let guide = root.path().join("guide");
        let shared = root.path().join("shared");
        fs::create_dir_all(&guide).unwrap();
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("note.md"), "shared note").unwrap();

        let expanded = resolve_includes(
            "<!-- @include: ../shared/note.md --> / <!-- @include: @/shared/note.md -->",
            &guide,
            root.path(),
        );

        assert_eq!(expanded.text, "shared note / shared note");
        assert_eq!(
            expanded.includes(),
            vec![shared.join("note.md"), shared.join("note.md")]
        );
    }
}
