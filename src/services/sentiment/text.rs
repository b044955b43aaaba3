//! Comment text cleanup
//!
//! Comment APIs deliver display text with inline markup (`<br>`, `<a href>`)
//! and HTML entities. Cleanup strips both and decides whether anything
//! readable is left.

use crate::domain::issue::Malformed;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref NUMERIC_ENTITY_RE: Regex = Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

/// Strip markup and entities; fails when no alphanumeric content remains
pub fn clean_comment(raw: &str) -> Result<String, Malformed> {
    let without_tags = TAG_RE.replace_all(raw, " ");
    let decoded = NUMERIC_ENTITY_RE.replace_all(&without_tags, |caps: &regex::Captures| {
        let code = &caps[1];
        let parsed = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        parsed.and_then(char::from_u32).map(String::from).unwrap_or_default()
    });

    let mut text = decoded.into_owned();
    for (entity, replacement) in NAMED_ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }

    let text = WHITESPACE_RE.replace_all(text.trim(), " ").into_owned();
    if !text.chars().any(char::is_alphanumeric) && !has_emoticon(&text) {
        return Err(Malformed::CommentText);
    }
    Ok(text)
}

fn has_emoticon(text: &str) -> bool {
    [":)", ":(", ":-)", ":-(", "<3", ":/"].iter().any(|e| text.contains(e))
}
