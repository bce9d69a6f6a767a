//! GIFT text to categories and questions.
//!
//! The parser is deliberately lenient: it never fails, fills in placeholder
//! titles and content, and drops answer segments it does not understand.
//! Rejecting bad input is the validator's job.

use regex::Regex;
use std::sync::OnceLock;

use super::blocks::{self, Segment};
use super::escape::{find_unescaped, rfind_unescaped, split_before_unescaped, unescape};
use super::paths::CategoryResolver;
use super::sanitize::clean_html;
use crate::models::{Category, Choice, Question, ROOT_CATEGORY_ID};

/// Display name of the root sentinel in parse output
pub const IMPORT_ROOT_NAME: &str = "Imported Questions";
pub const UNTITLED_QUESTION: &str = "Untitled Question";
pub const EMPTY_CONTENT: &str = "No content";

static FORMAT_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// Records produced from one GIFT document.
///
/// `categories` always starts with the root sentinel, followed by every
/// category created while resolving `$CATEGORY:` paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBank {
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
}

pub fn parse(text: &str) -> ParsedBank {
    parse_against(text, &[])
}

/// Parses `text`, resolving `$CATEGORY:` paths against `existing` first.
///
/// Paths that already exist in `existing` reuse those categories, so only
/// genuinely new categories (plus the root sentinel) are returned.
pub fn parse_against(text: &str, existing: &[Category]) -> ParsedBank {
    let mut categories = vec![Category::root(IMPORT_ROOT_NAME)];
    let mut resolver = CategoryResolver::new(existing);
    let mut questions = Vec::new();
    let mut current = ROOT_CATEGORY_ID.to_string();

    for segment in blocks::segment(text) {
        match segment {
            Segment::Category { path, .. } => {
                current = resolver.resolve(path, &mut categories);
            }
            Segment::Question(lines) => match parse_question(&lines.text(), &current) {
                Some(question) => questions.push(question),
                None => log::debug!(
                    "skipping block at line {}: no answer braces",
                    lines.start_line()
                ),
            },
        }
    }

    log::debug!(
        "parsed {} categories and {} questions",
        categories.len(),
        questions.len()
    );
    ParsedBank {
        categories,
        questions,
    }
}

/// Builds a question from one block, or `None` when the block has no `{`.
fn parse_question(block: &str, category_id: &str) -> Option<Question> {
    let open = find_unescaped(block, "{")?;
    let head = &block[..open];
    let after = &block[open + 1..];
    let body = match rfind_unescaped(after, "}") {
        Some(close) => &after[..close],
        None => after,
    };

    let (title, rest) = split_title(head);
    let name = title
        .map(|t| unescape(t).trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED_QUESTION.to_string());

    let content = clean_html(&unescape(strip_format_tag(&rest)));
    let content = if content.is_empty() {
        EMPTY_CONTENT.to_string()
    } else {
        content
    };

    if body.trim().is_empty() {
        return Some(Question::essay(category_id, name, content));
    }

    Some(Question::multiple_choice(
        category_id,
        name,
        content,
        parse_choices(body),
    ))
}

/// Separates `::title::` from the rest of the text before the answer braces.
fn split_title(head: &str) -> (Option<&str>, String) {
    let Some(start) = find_unescaped(head, "::") else {
        return (None, head.to_string());
    };
    let title_start = start + 2;
    let Some(len) = find_unescaped(&head[title_start..], "::") else {
        return (None, head.to_string());
    };
    let title_end = title_start + len;

    let mut rest = String::with_capacity(head.len());
    rest.push_str(&head[..start]);
    rest.push_str(&head[title_end + 2..]);
    (Some(&head[title_start..title_end]), rest)
}

/// Drops a leading `[html]`, `[moodle]`, `[plain]` or `[markdown]` tag.
fn strip_format_tag(text: &str) -> &str {
    let tag = FORMAT_TAG_REGEX
        .get_or_init(|| Regex::new(r"^\s*\[[A-Za-z]+\]").expect("Invalid format tag regex"));
    match tag.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    }
}

/// Reads `=correct` and `~wrong` answers from a brace body.
///
/// Text after an unescaped `#` is feedback and discarded. Anything else
/// (weights, numeric ranges, matching pairs) is ignored.
fn parse_choices(body: &str) -> Vec<Choice> {
    split_before_unescaped(body, &['=', '~', '#'])
        .into_iter()
        .filter_map(|piece| {
            let (is_correct, text) = if let Some(text) = piece.strip_prefix('=') {
                (true, text)
            } else if let Some(text) = piece.strip_prefix('~') {
                (false, text)
            } else {
                return None;
            };
            let text = clean_html(&unescape(text.trim()));
            (!text.is_empty()).then(|| Choice::new(text, is_correct))
        })
        .collect()
}
