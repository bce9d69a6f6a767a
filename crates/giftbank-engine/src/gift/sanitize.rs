//! Presentation cleanup for rich-text HTML fragments.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Attributes removed from every tag. Layout and styling only; semantic
/// attributes such as `href` or `src` are left alone.
pub const STRIPPED_ATTRIBUTES: &[&str] = &[
    "style",
    "class",
    "id",
    "dir",
    "lang",
    "face",
    "color",
    "size",
    "align",
    "valign",
    "bgcolor",
    "border",
    "cellpadding",
    "cellspacing",
    "width",
    "height",
];

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTE_REGEX: OnceLock<Regex> = OnceLock::new();
static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    // Quoted values may contain `>`.
    TAG_REGEX.get_or_init(|| {
        Regex::new(r#"<([A-Za-z][A-Za-z0-9:-]*)((?:"[^"]*"|'[^']*'|[^'">])*)>"#)
            .expect("Invalid tag regex")
    })
}

/// One `name` or `name=value` pair, quoted values consumed whole.
fn attribute_regex() -> &'static Regex {
    ATTRIBUTE_REGEX.get_or_init(|| {
        Regex::new(r#"\s*([^\s"'>/=]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?"#)
            .expect("Invalid attribute regex")
    })
}

fn is_stripped(name: &str) -> bool {
    STRIPPED_ATTRIBUTES
        .iter()
        .any(|stripped| stripped.eq_ignore_ascii_case(name))
}

/// Removes presentational attributes from every tag in `html`.
///
/// Tag names, remaining attributes and text content are preserved. A tag
/// whose attribute list ends up empty loses the whitespace before `>`. The
/// result is trimmed.
pub fn clean_html(html: &str) -> String {
    let cleaned = tag_regex().replace_all(html, |caps: &Captures| {
        format!("<{}{}>", &caps[1], clean_attributes(&caps[2]))
    });
    cleaned.trim().to_string()
}

fn clean_attributes(attributes: &str) -> String {
    let mut kept = String::with_capacity(attributes.len());
    let mut last = 0;
    for caps in attribute_regex().captures_iter(attributes) {
        let Some(pair) = caps.get(0) else {
            continue;
        };
        kept.push_str(&attributes[last..pair.start()]);
        if !is_stripped(&caps[1]) {
            kept.push_str(pair.as_str());
        }
        last = pair.end();
    }
    kept.push_str(&attributes[last..]);
    kept.truncate(kept.trim_end().len());
    kept
}

/// Renders an HTML fragment as a single line of plain text.
///
/// Tags are dropped, entities decoded and whitespace collapsed. Output longer
/// than `max_chars` characters is cut and suffixed with "...".
pub fn plain_text_preview(html: &str, max_chars: usize) -> String {
    let markup = MARKUP_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid markup regex"));
    let whitespace =
        WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

    let without_tags = markup.replace_all(html, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    let collapsed = whitespace.replace_all(decoded.trim(), " ");

    if collapsed.chars().count() > max_chars {
        let mut s: String = collapsed.chars().take(max_chars).collect();
        s.push_str("...");
        s
    } else {
        collapsed.into_owned()
    }
}
