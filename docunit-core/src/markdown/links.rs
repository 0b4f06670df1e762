//! Link collection and href rewriting.

use super::html_escape;
use crate::config::CleanUrls;
use crate::dead_links::is_localhost;
use once_cell::sync::Lazy;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

static EXTERNAL_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:[a-z][a-z0-9+.\-]*:|//)").unwrap());
static WEB_URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:https?:)?//").unwrap());

/// Collects link targets and rewrites hrefs for the output site
///
/// Internal links are recorded as written and their `.md` targets rewritten
/// for the clean-URL mode. External web links open in a new tab; only
/// `localhost` ones are recorded, since they never survive deployment.
pub struct LinkTransformer {
    clean_urls: CleanUrls,
}

impl LinkTransformer {
    pub fn new(clean_urls: CleanUrls) -> Self {
        Self { clean_urls }
    }

    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> (Vec<Event<'a>>, Vec<String>) {
        let mut result = Vec::with_capacity(events.len());
        let mut links = Vec::new();
        // One entry per open link: whether its start tag was emitted as raw HTML
        let mut open: Vec<bool> = Vec::new();

        for event in events {
            match event {
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let url = dest_url.to_string();

                    if link_type == LinkType::Email || url.is_empty() || url.starts_with('#') {
                        open.push(false);
                        result.push(Event::Start(Tag::Link {
                            link_type,
                            dest_url,
                            title,
                            id,
                        }));
                    } else if EXTERNAL_URL_RE.is_match(&url) {
                        if is_localhost(&url) {
                            links.push(url.clone());
                        }
                        if WEB_URL_RE.is_match(&url) {
                            open.push(true);
                            result.push(Event::InlineHtml(CowStr::Boxed(
                                external_anchor(&url, &title).into_boxed_str(),
                            )));
                        } else {
                            open.push(false);
                            result.push(Event::Start(Tag::Link {
                                link_type,
                                dest_url,
                                title,
                                id,
                            }));
                        }
                    } else {
                        let href = rewrite_href(&url, self.clean_urls);
                        links.push(url);
                        open.push(false);
                        result.push(Event::Start(Tag::Link {
                            link_type,
                            dest_url: CowStr::Boxed(href.into_boxed_str()),
                            title,
                            id,
                        }));
                    }
                }
                Event::End(TagEnd::Link) => {
                    if open.pop().unwrap_or(false) {
                        result.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
                    } else {
                        result.push(Event::End(TagEnd::Link));
                    }
                }
                other => result.push(other),
            }
        }

        (result, links)
    }
}

fn external_anchor(url: &str, title: &str) -> String {
    let mut anchor = format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\"",
        html_escape(url)
    );
    if !title.is_empty() {
        anchor.push_str(&format!(" title=\"{}\"", html_escape(title)));
    }
    anchor.push('>');
    anchor
}

/// Rewrite a `.md` target for the output site, leaving query and hash intact
///
/// `index.md` targets collapse to their directory.
pub fn rewrite_href(url: &str, clean_urls: CleanUrls) -> String {
    let split = url.find(['?', '#']).unwrap_or(url.len());
    let (path, suffix) = url.split_at(split);

    let rewritten = if path == "index.md" {
        "./".to_string()
    } else if let Some(dir) = path.strip_suffix("/index.md") {
        format!("{dir}/")
    } else if let Some(stem) = path.strip_suffix(".md") {
        match clean_urls {
            CleanUrls::Disabled => format!("{stem}.html"),
            CleanUrls::WithoutSubfolders => stem.to_string(),
            CleanUrls::WithSubfolders => format!("{stem}/"),
        }
    } else {
        return url.to_string();
    };

    format!("{rewritten}{suffix}")
}
