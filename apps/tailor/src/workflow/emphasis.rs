//! Marks emphasized skills inside transformed bullets, and strips markup from
//! text before it goes into the downloaded resume.

use std::cmp::Reverse;
use std::sync::OnceLock;

use regex::Regex;

/// A run of bullet text, either plain or a skill occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub emphasized: bool,
}

impl<'a> Span<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            emphasized: false,
        }
    }
}

/// Splits `text` into spans, marking case-insensitive occurrences of `skills`.
///
/// Skills match literally; at any position the longest skill wins and
/// matches never overlap. Blank skill names are ignored.
pub fn emphasize<'a>(text: &'a str, skills: &[String]) -> Vec<Span<'a>> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut names: Vec<&str> = skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() {
        return vec![Span::plain(text)];
    }
    names.sort_by_key(|s| Reverse(s.len()));
    names.dedup();

    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(pattern) = Regex::new(&format!("(?i)(?:{alternation})")) else {
        return vec![Span::plain(text)];
    };

    let mut spans = Vec::new();
    let mut cursor = 0;
    for found in pattern.find_iter(text) {
        if found.start() > cursor {
            spans.push(Span::plain(&text[cursor..found.start()]));
        }
        spans.push(Span {
            text: found.as_str(),
            emphasized: true,
        });
        cursor = found.end();
    }
    if cursor < text.len() {
        spans.push(Span::plain(&text[cursor..]));
    }
    spans
}

/// Text content of an HTML fragment: tags removed, common entities decoded.
///
/// Only `<name ...>` / `</name>` count as tags, so a bare `<` or `>` used as
/// a comparison stays in the text.
pub fn strip_markup(text: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| {
        Regex::new(r"</?[A-Za-z][A-Za-z0-9-]*(?:\s[^<>]*)?/?>").expect("tag pattern is valid")
    });

    tag.replace_all(text, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
