//! Discovery of markdown pages under the source root.

use crate::paths::to_slash;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Find every page below `src_dir`
///
/// Returns source-relative, `/`-separated identifiers without the `.md`
/// extension, sorted. Dot-directories and `node_modules` are skipped, as
/// are paths matching any `exclude` pattern.
pub fn discover_pages(src_dir: &Path, exclude: &[String]) -> Vec<String> {
    let exclude = compile_patterns(exclude, "src_exclude");
    let mut pages = Vec::new();

    for entry in WalkDir::new(src_dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "md") {
            continue;
        }

        let rel = to_slash(path.strip_prefix(src_dir).unwrap_or(path));
        if exclude.iter().any(|re| re.is_match(&rel)) {
            tracing::debug!("Ignoring {} due to src_exclude", rel);
            continue;
        }

        if let Some(id) = rel.strip_suffix(".md") {
            pages.push(id.to_string());
        }
    }

    pages.sort();
    pages
}

/// Absolute path of the markdown file behind a page identifier
pub fn page_path(src_dir: &Path, page: &str) -> PathBuf {
    src_dir.join(format!("{page}.md"))
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || name == "node_modules")
}

/// Compile user-supplied regexes, warning about and dropping invalid ones
pub(crate) fn compile_patterns(patterns: &[String], setting: &str) -> Vec<Regex> {
    let mut compiled = Vec::new();
    for pat in patterns {
        match Regex::new(pat) {
            Ok(re) => compiled.push(re),
            Err(err) => tracing::warn!("Invalid {} pattern '{}': {}", setting, pat, err),
        }
    }
    compiled
}
