//! Generation of the component unit around rendered HTML.

use crate::guard::ConstantGuard;
use docunit_types::PageData;
use once_cell::sync::Lazy;
use regex::Regex;

const SCRIPT_CLOSE: &str = "</script>";

static SCRIPT_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*<\s*script\b").unwrap());
static SCRIPT_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<\s*/\s*script\s*>").unwrap());
static SCRIPT_LANG_TS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<\s*script[^>]*\blang=['"]ts['"][^>]*"#).unwrap());
static SCRIPT_SETUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*script[^>]*\bsetup\b[^>]*").unwrap());
static SCRIPT_CLIENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*script[^>]*\bclient\b[^>]*").unwrap());
static DEFAULT_EXPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\n|;)\s*export\s+default\b").unwrap());
static NAMED_DEFAULT_EXPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\n|;)\s*export\b.+\bas\s+default\b").unwrap());

/// Name of the exported page metadata constant
pub const PAGE_DATA_EXPORT: &str = "__pageData";

/// Inject the page metadata constant into the hoisted tags
///
/// The first plain script block (not `setup`, not `client`) receives the
/// constant just before its closing tag, plus a fallback default export when
/// it has none. Without such a block a new one is prepended. Every other tag
/// is returned unchanged.
pub fn inject_page_data(
    mut tags: Vec<String>,
    page: &PageData,
    guard: &ConstantGuard,
) -> Result<Vec<String>, serde_json::Error> {
    let json = serde_json::to_string(page)?;
    let literal = serde_json::to_string(guard.escape_code(&json).as_ref())?;
    let code = format!("\nexport const {PAGE_DATA_EXPORT} = JSON.parse({literal})");
    let fallback_export = format!(
        "\nexport default {{name:{}}}",
        serde_json::to_string(&page.relative_path)?
    );

    let target = tags
        .iter()
        .enumerate()
        .find_map(|(idx, tag)| plain_script_close(tag).map(|close| (idx, close)));

    match target {
        Some((idx, close)) => {
            let tag = &mut tags[idx];
            let mut injected = code;
            if !has_default_export(tag) {
                injected.push_str(&fallback_export);
            }
            tag.insert_str(close, &injected);
        }
        None => {
            let open = if tags.iter().any(|tag| SCRIPT_LANG_TS_RE.is_match(tag)) {
                r#"<script lang="ts">"#
            } else {
                "<script>"
            };
            tags.insert(0, format!("{open}{code}{fallback_export}{SCRIPT_CLOSE}"));
        }
    }

    Ok(tags)
}

/// Lay out the final unit: scripts, the template, then every other tag
pub fn assemble_unit(tags: Vec<String>, html: &str) -> String {
    let (scripts, others): (Vec<String>, Vec<String>) =
        tags.into_iter().partition(|tag| is_script(tag));

    let mut parts = scripts;
    parts.push(format!("<template><div>{html}</div></template>"));
    parts.extend(others);
    parts.join("\n")
}

fn is_script(tag: &str) -> bool {
    SCRIPT_OPEN_RE.is_match(tag)
}

/// Offset of the closing tag of a script that is neither `setup` nor `client`
fn plain_script_close(tag: &str) -> Option<usize> {
    if !is_script(tag) || SCRIPT_SETUP_RE.is_match(tag) || SCRIPT_CLIENT_RE.is_match(tag) {
        return None;
    }
    SCRIPT_CLOSE_RE.find(tag).map(|m| m.start())
}

fn has_default_export(tag: &str) -> bool {
    DEFAULT_EXPORT_RE.is_match(tag) || NAMED_DEFAULT_EXPORT_RE.is_match(tag)
}
