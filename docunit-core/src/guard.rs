//! Escaping of bundler-reserved constant names in generated output.
//!
//! A later build step replaces literal occurrences of names such as
//! `process.env` or `import.meta` throughout the bundle. When those names
//! appear as documentation text they must survive untouched, so every
//! occurrence is split after its first character by an invisible marker.

use regex::{Captures, Regex};
use std::borrow::Cow;

/// Invisible marker inserted into reserved tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// U+200B, used inside generated script code
    ZeroWidth,
    /// `<wbr>`, used inside rendered markup
    WordBreak,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::ZeroWidth => "\u{200b}",
            Marker::WordBreak => "<wbr>",
        }
    }
}

/// Inserts markers into reserved constant names
#[derive(Debug, Clone)]
pub struct ConstantGuard {
    pattern: Regex,
}

impl ConstantGuard {
    /// Reserve `process.env`, plus `import.meta` and every define key for production builds
    pub fn new<I, S>(production: bool, define_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = vec!["process.env".to_string()];
        if production {
            tokens.push("import.meta".to_string());
            tokens.extend(
                define_keys
                    .into_iter()
                    .map(|key| key.as_ref().to_string())
                    .filter(|key| !key.is_empty()),
            );
        }
        Self::with_tokens(&tokens)
    }

    fn with_tokens(tokens: &[String]) -> Self {
        let alternation = tokens
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?-u:\b)(?:{alternation})"))
            .expect("escaped literal alternation is a valid regex");
        Self { pattern }
    }

    /// Split every reserved token in `text` with `marker`
    pub fn escape<'t>(&self, text: &'t str, marker: Marker) -> Cow<'t, str> {
        self.pattern.replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            let split = token.chars().next().map_or(0, char::len_utf8);
            format!("{}{}{}", &token[..split], marker.as_str(), &token[split..])
        })
    }

    /// Guard text bound for generated script code
    pub fn escape_code<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.escape(text, Marker::ZeroWidth)
    }

    /// Guard text bound for rendered markup
    pub fn escape_markup<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.escape(text, Marker::WordBreak)
    }
}

impl Default for ConstantGuard {
    fn default() -> Self {
        Self::new(false, std::iter::empty::<&str>())
    }
}
