//! Integration tests for markdown processing

use super::*;

fn render_with(source: &str, clean_urls: CleanUrls) -> (Rendered, RenderEnv) {
    let mut env = RenderEnv::new(Path::new("/docs/guide/index.md"), "guide/index.md", clean_urls);
    let rendered = MarkdownRenderer::new()
        .render(source, &mut env)
        .expect("render should succeed");
    (rendered, env)
}

#[test]
fn test_full_document() {
    let markdown = r#"---
title: Guide
---

<script setup>
import Badge from './Badge.vue'
</script>

# Guide <Badge />

See [install](./install.md) and [the site](https://example.com).

## Options

<style scoped>
h2 { color: red }
</style>
"#;
    let (rendered, env) = render_with(markdown, CleanUrls::Disabled);

    println!("HTML: {}", rendered.html);

    assert_eq!(env.frontmatter.unwrap()["title"], "Guide");
    assert!(env.content.unwrap().starts_with("\n<script setup>"));

    assert_eq!(rendered.side.links, vec!["./install.md"]);
    assert_eq!(rendered.side.hoisted_tags.len(), 2);
    assert!(rendered.side.hoisted_tags[0].starts_with("<script setup>"));
    assert!(rendered.side.hoisted_tags[1].starts_with("<style scoped>"));

    let titles: Vec<_> = rendered
        .side
        .headers
        .iter()
        .map(|h| (h.level, h.title.as_str(), h.slug.as_str()))
        .collect();
    assert_eq!(titles, vec![(1, "Guide", "guide"), (2, "Options", "options")]);

    assert!(rendered.html.contains(r#"href="./install.html""#));
    assert!(rendered.html.contains(r#"target="_blank""#));
    assert!(rendered.html.contains("<Badge />"));
    assert!(!rendered.html.contains("<script"));
}

#[test]
fn test_clean_urls_with_subfolders() {
    let (rendered, _) = render_with("[api](../api/reference.md)", CleanUrls::WithSubfolders);
    assert!(rendered.html.contains(r#"href="../api/reference/""#));
    assert_eq!(rendered.side.links, vec!["../api/reference.md"]);
}

#[test]
fn test_empty_document() {
    let (rendered, env) = render_with("", CleanUrls::Disabled);

    assert!(rendered.html.is_empty());
    assert_eq!(rendered.side, SideChannelData::default());
    assert_eq!(env.content.as_deref(), Some(""));
}

#[test]
fn test_footnotes_and_tasklists() {
    let markdown = "- [x] done\n- [ ] todo\n\nText[^1]\n\n[^1]: Note\n";
    let (rendered, _) = render_with(markdown, CleanUrls::Disabled);

    assert!(rendered.html.contains("type=\"checkbox\""));
    assert!(rendered.html.contains("footnote"));
}
