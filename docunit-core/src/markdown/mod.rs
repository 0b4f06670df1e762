//! Markdown rendering with side-channel extraction.
//!
//! The compiler talks to renderers through [`Renderer`]. Each call receives
//! its own [`RenderEnv`], which the renderer fills with the post-frontmatter
//! content and the parsed frontmatter, and returns the HTML body together
//! with the links, headings and hoisted tags it found.

pub mod headings;
pub mod hoist;
pub mod links;

#[cfg(test)]
mod test_integration;

use crate::config::CleanUrls;
use crate::frontmatter::{parse_frontmatter, FrontmatterError};
use docunit_types::{Frontmatter, Header};
use pulldown_cmark::{html, Event, Options, Parser};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use headings::HeadingTransformer;
pub use hoist::TagHoister;
pub use links::LinkTransformer;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Frontmatter error in {path}: {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },
}

/// Per-call rendering context
///
/// Inputs are set by the caller; `content` and `frontmatter` are filled by
/// the renderer.
#[derive(Debug, Clone)]
pub struct RenderEnv {
    pub path: PathBuf,
    pub relative_path: String,
    pub clean_urls: CleanUrls,
    pub content: Option<String>,
    pub frontmatter: Option<Frontmatter>,
}

impl RenderEnv {
    pub fn new(path: &Path, relative_path: impl Into<String>, clean_urls: CleanUrls) -> Self {
        Self {
            path: path.to_path_buf(),
            relative_path: relative_path.into(),
            clean_urls,
            content: None,
            frontmatter: None,
        }
    }
}

/// Data collected while rendering, returned beside the HTML
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideChannelData {
    /// Link targets as written in the source
    pub links: Vec<String>,
    pub headers: Vec<Header>,
    /// Top-level `<script>` / `<style>` blocks removed from the body
    pub hoisted_tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: String,
    pub side: SideChannelData,
}

/// A markdown rendering engine
pub trait Renderer: Send + Sync {
    fn render(&self, source: &str, env: &mut RenderEnv) -> Result<Rendered, RenderError>;
}

/// Markdown processor built on pulldown-cmark
pub struct MarkdownRenderer {
    options: Options,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }

    /// Render a body that has already had its frontmatter removed
    fn render_body(&self, body: &str, clean_urls: CleanUrls) -> Rendered {
        let events: Vec<Event> = Parser::new_ext(body, self.options).collect();

        let (events, hoisted_tags) = TagHoister::new().transform(events);

        let (events, headers) = HeadingTransformer::new().transform(events);

        let (events, links) = LinkTransformer::new(clean_urls).transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Rendered {
            html: html_output,
            side: SideChannelData {
                links,
                headers,
                hoisted_tags,
            },
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, source: &str, env: &mut RenderEnv) -> Result<Rendered, RenderError> {
        let (frontmatter, body) =
            parse_frontmatter(source).map_err(|source| RenderError::Frontmatter {
                path: env.path.clone(),
                source,
            })?;

        let rendered = self.render_body(body, env.clean_urls);

        env.content = Some(body.to_string());
        env.frontmatter = Some(frontmatter);
        Ok(rendered)
    }
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> (Rendered, RenderEnv) {
        let mut env = RenderEnv::new(
            Path::new("/docs/guide/index.md"),
            "guide/index.md",
            CleanUrls::Disabled,
        );
        let rendered = MarkdownRenderer::new().render(source, &mut env).unwrap();
        (rendered, env)
    }

    #[test]
    fn test_basic_markdown() {
        let (rendered, _) = render("# Hello World\n\nThis is a **test**.");
        assert!(rendered.html.contains("<h1"));
        assert!(rendered.html.contains("Hello World"));
        assert!(rendered.html.contains("<strong>test</strong>"));
    }

    #[test]
    fn test_tables() {
        let md = r#"
| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |
"#;
        let (rendered, _) = render(md);
        assert!(rendered.html.contains("<table>"));
        assert!(rendered.html.contains("<th>Header 1</th>"));
    }

    #[test]
    fn test_env_receives_content_and_frontmatter() {
        let (_, env) = render("---\ntitle: Intro\n---\n# Body\n");
        assert_eq!(env.content.as_deref(), Some("# Body\n"));
        assert_eq!(env.frontmatter.unwrap()["title"], "Intro");
    }

    #[test]
    fn test_env_without_frontmatter() {
        let (_, env) = render("Plain");
        assert_eq!(env.content.as_deref(), Some("Plain"));
        assert!(env.frontmatter.unwrap().is_empty());
    }

    #[test]
    fn test_malformed_frontmatter_fails() {
        let mut env = RenderEnv::new(Path::new("/docs/bad.md"), "bad.md", CleanUrls::Disabled);
        let err = MarkdownRenderer::new()
            .render("---\ntitle: [oops\n---\nBody", &mut env)
            .unwrap_err();

        assert!(err.to_string().contains("/docs/bad.md"));
        assert!(env.content.is_none());
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
