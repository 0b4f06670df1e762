//! Page title and description inference.

use docunit_types::Frontmatter;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*#+\s+(.*)").unwrap());

static INTERPOLATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\{\s*(?:'([^']*)'|"([^"]*)"|`([^`]*)`)\s*\}\}"#).unwrap()
});
static HEADING_ATTRS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\{#[^}]*\}\s*$").unwrap());
static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[A-Za-z][^>]*>").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap());
static STRONG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap());
static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s][^*]*?)\*|\b_([^_\s][^_]*?)_\b").unwrap());
static STRIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.+?)~~").unwrap());
static ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\([!-/:-@\[-`{-~])").unwrap());

/// Resolve the page title
///
/// Frontmatter `title` wins; otherwise the first markdown heading of the
/// content is used; otherwise the title is empty.
pub fn infer_title(frontmatter: &Frontmatter, content: &str) -> String {
    if let Some(title) = frontmatter.get("title").and_then(value_text) {
        return normalize_header_text(&title);
    }

    HEADING_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| normalize_header_text(m.as_str()))
        .unwrap_or_default()
}

/// Resolve the page description
///
/// A `description` key counts as present even when empty. Without it the
/// first `head` entry of the form `["meta", {name: "description", content}]`
/// is consulted.
pub fn infer_description(frontmatter: &Frontmatter) -> String {
    if let Some(description) = frontmatter.get("description") {
        return value_text(description).unwrap_or_default();
    }

    frontmatter
        .get("head")
        .and_then(Value::as_array)
        .and_then(|head| head.iter().find_map(meta_description))
        .unwrap_or_default()
}

/// Frontmatter `titleTemplate`, passed through unchanged
pub fn infer_title_template(frontmatter: &Frontmatter) -> Option<Value> {
    frontmatter.get("titleTemplate").cloned()
}

fn meta_description(entry: &Value) -> Option<String> {
    let entry = entry.as_array()?;
    if entry.first()?.as_str()? != "meta" {
        return None;
    }
    let attrs = entry.get(1)?.as_object()?;
    if attrs.get("name")?.as_str()? != "description" {
        return None;
    }
    attrs.get("content").and_then(value_text)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reduce heading markup to the text a reader sees
///
/// Supported forms:
/// - `{{ 'text' }}`, `{{ "text" }}` and ``{{ `text` }}`` interpolations of string literals
/// - inline code spans, whose content is kept verbatim
/// - a trailing `{#custom-id}` attribute block
/// - HTML tags, links, images, emphasis, strikethrough and backslash escapes
/// - the five basic HTML entities
///
/// Any other `{{ expression }}` is left as written.
pub fn normalize_header_text(raw: &str) -> String {
    let text = INTERPOLATION_RE.replace_all(raw, |caps: &Captures| {
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    });
    let text = HEADING_ATTRS_RE.replace(&text, "");

    let mut out = String::with_capacity(text.len());
    for (idx, segment) in text.split('`').enumerate() {
        // Odd segments sit between backticks
        if idx % 2 == 1 {
            out.push_str(segment);
        } else {
            out.push_str(&strip_inline_markup(segment));
        }
    }

    decode_entities(out.trim())
}

fn strip_inline_markup(segment: &str) -> String {
    let text = HTML_TAG_RE.replace_all(segment, "");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = STRONG_RE.replace_all(&text, "$1$2");
    let text = EMPHASIS_RE.replace_all(&text, "$1$2");
    let text = STRIKE_RE.replace_all(&text, "$1");
    ESCAPE_RE.replace_all(&text, "$1").into_owned()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
