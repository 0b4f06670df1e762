//! Heading collection, id injection and anchors.

use super::html_escape;
use crate::slug::{slugify, SlugRegistry};
use docunit_types::Header;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

/// Assigns unique ids to headings and records them as [`Header`]s
pub struct HeadingTransformer {
    registry: SlugRegistry,
}

impl HeadingTransformer {
    pub fn new() -> Self {
        Self {
            registry: SlugRegistry::new(),
        }
    }

    pub fn transform<'a>(mut self, events: Vec<Event<'a>>) -> (Vec<Event<'a>>, Vec<Header>) {
        let mut result = Vec::with_capacity(events.len());
        let mut headers = Vec::new();
        // Index of the open heading's Start event and its accumulated text
        let mut open: Option<(usize, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::Heading { .. }) => {
                    open = Some((result.len(), String::new()));
                    result.push(event);
                }
                Event::Text(ref text) | Event::Code(ref text) => {
                    if let Some((_, title)) = open.as_mut() {
                        title.push_str(text);
                    }
                    result.push(event);
                }
                Event::End(TagEnd::Heading(level)) => {
                    if let Some((start, title)) = open.take() {
                        let title = title.trim().to_string();
                        let slug = self.assign_id(&mut result[start], &title);
                        let anchor = format!(
                            "<a class=\"header-anchor\" href=\"#{}\" aria-label=\"Permalink to {}\">#</a>",
                            html_escape(&slug),
                            html_escape(&title)
                        );
                        result.push(Event::InlineHtml(CowStr::Boxed(anchor.into_boxed_str())));
                        headers.push(Header::new(level as u32, title, slug));
                    }
                    result.push(Event::End(TagEnd::Heading(level)));
                }
                other => result.push(other),
            }
        }

        (result, headers)
    }

    /// Give the heading at `start` an id, keeping an explicit `{#id}`
    fn assign_id(&mut self, start: &mut Event<'_>, title: &str) -> String {
        let Event::Start(Tag::Heading { id, .. }) = start else {
            return self.registry.unique(slugify(title));
        };

        if let Some(explicit) = id.as_deref() {
            self.registry.unique(explicit.to_string());
            return explicit.to_string();
        }

        let slug = self.registry.unique(slugify(title));
        *id = Some(CowStr::Boxed(slug.clone().into_boxed_str()));
        slug
    }
}

impl Default for HeadingTransformer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{html, Options, Parser};

    fn run(md: &str) -> (String, Vec<Header>) {
        let events: Vec<Event> = Parser::new_ext(md, Options::ENABLE_HEADING_ATTRIBUTES).collect();
        let (events, headers) = HeadingTransformer::new().transform(events);
        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        (out, headers)
    }

    #[test]
    fn test_ids_and_anchors() {
        let (html, headers) = run("## Getting Started\n");

        assert!(html.contains("<h2 id=\"getting-started\">"));
        assert!(html.contains("class=\"header-anchor\" href=\"#getting-started\""));
        assert_eq!(headers, vec![Header::new(2, "Getting Started", "getting-started")]);
        assert_eq!(headers[0].link, "#getting-started");
    }

    #[test]
    fn test_duplicate_titles_get_suffixes() {
        let (_, headers) = run("## Usage\n\n### Usage\n\n## Usage\n");
        let slugs: Vec<_> = headers.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["usage", "usage-1", "usage-2"]);
    }

    #[test]
    fn test_explicit_id_wins() {
        let (html, headers) = run("## Install Steps {#setup}\n");

        assert!(html.contains("id=\"setup\""));
        assert_eq!(headers[0].slug, "setup");
        assert_eq!(headers[0].title, "Install Steps");
    }

    #[test]
    fn test_inline_markup_in_title() {
        let (_, headers) = run("# Using `cargo` **fast**\n");
        assert_eq!(headers[0].title, "Using cargo fast");
        assert_eq!(headers[0].level, 1);
    }
}
