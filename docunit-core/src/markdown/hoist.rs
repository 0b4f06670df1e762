//! Extraction of top-level script and style blocks.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Tag, TagEnd};
use regex::Regex;

static HOISTED_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*<(?:script|style)\b").unwrap());

/// Moves top-level `<script>` and `<style>` HTML blocks out of the body
///
/// Blocks nested in lists, quotes or other containers stay where they are.
pub struct TagHoister;

impl TagHoister {
    pub fn new() -> Self {
        Self
    }

    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> (Vec<Event<'a>>, Vec<String>) {
        let mut result = Vec::with_capacity(events.len());
        let mut hoisted = Vec::new();
        let mut depth = 0usize;
        let mut block: Option<Vec<Event<'a>>> = None;

        for event in events {
            if let Some(buffer) = block.as_mut() {
                if let Event::End(TagEnd::HtmlBlock) = event {
                    buffer.push(event);
                    let buffer = block.take().unwrap_or_default();
                    flush_block(buffer, &mut result, &mut hoisted);
                    depth = depth.saturating_sub(1);
                } else {
                    buffer.push(event);
                }
                continue;
            }

            match event {
                Event::Start(Tag::HtmlBlock) if depth == 0 => {
                    depth += 1;
                    block = Some(vec![event]);
                }
                Event::Start(_) => {
                    depth += 1;
                    result.push(event);
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    result.push(event);
                }
                other => result.push(other),
            }
        }

        // Unterminated block: keep it in the body
        if let Some(buffer) = block {
            result.extend(buffer);
        }

        (result, hoisted)
    }
}

impl Default for TagHoister {
    fn default() -> Self {
        Self::new()
    }
}

/// Hoist a buffered HTML block when it opens with a script or style tag
fn flush_block<'a>(buffer: Vec<Event<'a>>, result: &mut Vec<Event<'a>>, hoisted: &mut Vec<String>) {
    let raw: String = buffer
        .iter()
        .filter_map(|event| match event {
            Event::Html(text) => Some(text.as_ref()),
            _ => None,
        })
        .collect();

    if HOISTED_TAG_RE.is_match(&raw) {
        hoisted.push(raw.trim().to_string());
    } else {
        result.extend(buffer);
    }
}
