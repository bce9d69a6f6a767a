//! Categories and questions to GIFT text.

use std::collections::HashMap;

use super::escape::escape;
use super::paths::{CategoryIndex, TOP_SEGMENT};
use crate::models::{Category, Question, QuestionKind};

/// What to export and how to label it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions<'a> {
    /// Export only this category and its descendants
    pub scope: Option<&'a str>,
    /// Path prepended to every `$CATEGORY:` value, e.g. `top/Course`
    pub context_prefix: Option<&'a str>,
}

/// Renders categories and their questions as GIFT.
///
/// Categories are emitted in stored order, or in pre-order of the scoped
/// subtree. Each category block is followed by its questions in stored order.
/// Categories whose path cannot be resolved are skipped.
pub fn export(
    categories: &[Category],
    questions: &[Question],
    options: &ExportOptions,
) -> String {
    let index = CategoryIndex::new(categories);

    let mut by_category: HashMap<&str, Vec<&Question>> = HashMap::new();
    for question in questions {
        by_category
            .entry(question.category_id.as_str())
            .or_default()
            .push(question);
    }

    let targets: Vec<&Category> = match options.scope {
        Some(scope) => index.descendants_preorder(scope),
        None => index.iter().collect(),
    };

    let mut out = String::new();
    for category in targets {
        let Some(path) = index.path_of(&category.id) else {
            log::warn!("skipping category {} with unresolvable path", category.id);
            continue;
        };
        let path = qualified_path(options.context_prefix.unwrap_or(""), &path);

        out.push_str(&format!(
            "\n// question: 0  name: Switch category to {path}\n$CATEGORY: {path}\n\n"
        ));

        for question in by_category.get(category.id.as_str()).into_iter().flatten() {
            write_question(&mut out, question);
        }
    }

    out.trim().to_string()
}

fn write_question(out: &mut String, question: &Question) {
    let fragment: String = question.id.chars().take(8).collect();
    out.push_str(&format!(
        "\n// question: {fragment}  name: {}\n",
        comment_text(question.name.trim())
    ));
    out.push_str(&format!(
        "::{}::[html]{}{{\n",
        escape(&without_blank_lines(question.name.trim())),
        escape(&without_blank_lines(&question.content))
    ));

    if question.kind == QuestionKind::MultipleChoice {
        for choice in &question.choices {
            let marker = if choice.is_correct { '=' } else { '~' };
            out.push_str(&format!(
                "\t{marker}{}\n",
                escape(&without_blank_lines(choice.text.trim()))
            ));
        }
    }

    out.push_str("}\n");
}

/// Joins the context prefix and a category path into a `$CATEGORY:` value.
///
/// The root sentinel with no prefix becomes `top`, which imports back to the
/// sentinel.
pub fn qualified_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim().trim_end_matches('/');
    let path = path.trim_matches('/');
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => TOP_SEGMENT.to_string(),
        (true, false) => path.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}/{path}"),
    }
}

/// File name offered when saving an export of `bank_name`.
pub fn suggested_file_name(bank_name: &str) -> String {
    let cleaned: String = bank_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if cleaned.trim().is_empty() {
        "bank"
    } else {
        cleaned.trim()
    };
    format!("{stem}.gift.txt")
}

// Blank lines delimit blocks, so they cannot survive inside one.
fn without_blank_lines(text: &str) -> String {
    if !text.contains('\n') {
        return text.to_string();
    }
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// A `::` would turn the comment into a title line.
fn comment_text(text: &str) -> String {
    text.replace(['\r', '\n'], " ").replace("::", ": :")
}
