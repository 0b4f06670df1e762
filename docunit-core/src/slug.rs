//! Heading slug generation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static CONTROL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x00-\x1f]").unwrap());
static COMBINING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\u{0300}-\u{036F}]").unwrap());
static SPECIAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[\s~`!@#$%^&*()\-_+=\[\]{}|\\;:"'“”‘’<>,.?/]+"#).unwrap()
});
static LEADING_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d)").unwrap());

/// Convert heading text to an anchor slug
///
/// Rules:
/// - Drop control characters and combining marks
/// - Replace runs of whitespace and punctuation with a single hyphen
/// - Trim leading/trailing hyphens
/// - Prefix an underscore when the slug would start with a digit
/// - Lowercase
///
/// # Examples
///
/// ```
/// use docunit_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("2. Install"), "_2-install");
/// ```
pub fn slugify(input: &str) -> String {
    let stripped = COMBINING_RE.replace_all(input, "");
    let stripped = CONTROL_RE.replace_all(&stripped, "");
    let hyphenated = SPECIAL_RE.replace_all(&stripped, "-");
    let trimmed = hyphenated.trim_matches('-');
    LEADING_DIGIT_RE
        .replace(trimmed, "_$1")
        .to_lowercase()
}

/// Hands out unique slugs within one document
#[derive(Debug, Default)]
pub struct SlugRegistry {
    seen: HashMap<String, usize>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `slug` the first time, then `slug-1`, `slug-2`, ...
    pub fn unique(&mut self, slug: String) -> String {
        let Some(&count) = self.seen.get(&slug) else {
            self.seen.insert(slug.clone(), 1);
            return slug;
        };

        let mut n = count;
        let mut candidate = format!("{slug}-{n}");
        while self.seen.contains_key(&candidate) {
            n += 1;
            candidate = format!("{slug}-{n}");
        }
        self.seen.insert(slug, n + 1);
        self.seen.insert(candidate.clone(), 1);
        candidate
    }
}
