//! Shared types for docunit
//!
//! This crate provides the data model produced by the compilation pipeline:
//! page metadata, heading records, and the compiled unit itself.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parsed frontmatter: arbitrary keys mapped to arbitrary values
pub type Frontmatter = serde_json::Map<String, serde_json::Value>;

/// A heading found while rendering a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Heading level, 1 through 6
    pub level: u32,

    /// Plain heading text
    pub title: String,

    /// Anchor id, unique within the document
    pub slug: String,

    /// In-page link to the heading (`#slug`)
    pub link: String,
}

impl Header {
    pub fn new(level: u32, title: impl Into<String>, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            level,
            title: title.into(),
            link: format!("#{slug}"),
            slug,
        }
    }
}

/// Metadata for a single page, serialized verbatim into the generated unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub title: String,

    /// Either a template string or a boolean switch, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_template: Option<serde_json::Value>,

    pub description: String,

    pub frontmatter: Frontmatter,

    pub headers: Vec<Header>,

    /// Path of the source file relative to the source root (`guide/index.md`)
    pub relative_path: String,

    /// Last modification time in epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<i64>,
}

/// Output of compiling one markdown file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    /// Generated component source: script block(s) followed by a template block
    pub unit_source: String,

    pub page_data: PageData,

    /// Links that resolved to neither a known page nor a public asset
    pub dead_links: Vec<String>,

    /// Absolute paths of files pulled in by include directives
    pub includes: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_page() -> PageData {
        PageData {
            title: "Intro".into(),
            title_template: None,
            description: String::new(),
            frontmatter: Frontmatter::new(),
            headers: vec![Header::new(2, "Setup", "setup")],
            relative_path: "guide/index.md".into(),
            last_updated: None,
        }
    }

    #[test]
    fn test_header_link() {
        let header = Header::new(2, "Getting Started", "getting-started");
        assert_eq!(header.link, "#getting-started");
    }

    #[test]
    fn test_page_data_uses_camel_case() {
        let value = serde_json::to_value(sample_page()).unwrap();
        assert_eq!(value["relativePath"], "guide/index.md");
        assert!(value.get("titleTemplate").is_none());
        assert!(value.get("lastUpdated").is_none());
    }

    #[test]
    fn test_page_data_optional_fields_serialized_when_set() {
        let page = PageData {
            title_template: Some(json!(":title | Docs")),
            last_updated: Some(1_700_000_000_000),
            ..sample_page()
        };
        let value = serde_json::to_value(page).unwrap();
        assert_eq!(value["titleTemplate"], ":title | Docs");
        assert_eq!(value["lastUpdated"], 1_700_000_000_000i64);
    }
}
