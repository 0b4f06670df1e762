//! Frontmatter parsing from markdown files.

use docunit_types::Frontmatter;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Frontmatter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|$)(.*)$").unwrap()
    })
}

/// Split frontmatter from markdown content
///
/// Returns a tuple of (frontmatter, markdown_body).
/// If no frontmatter is present, returns an empty mapping with the full content as body.
///
/// # Example
///
/// ```
/// use docunit_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\norder: 2\n---\n# Hello World\n";
///
/// let (fm, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(fm["title"], "My Post");
/// assert_eq!(fm["order"], 2);
/// assert!(body.starts_with("# Hello World"));
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let Some(captures) = frontmatter_regex().captures(content) else {
        return Ok((Frontmatter::new(), content));
    };

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    if yaml.trim().is_empty() {
        return Ok((Frontmatter::new(), body));
    }

    match serde_yaml::from_str::<serde_json::Value>(yaml)? {
        serde_json::Value::Object(map) => Ok((map, body)),
        serde_json::Value::Null => Ok((Frontmatter::new(), body)),
        other => Err(FrontmatterError::NotAMapping(value_kind(&other))),
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a sequence",
        serde_json::Value::Object(_) => "a mapping",
    }
}
