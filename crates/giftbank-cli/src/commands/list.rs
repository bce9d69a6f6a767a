use std::collections::HashSet;
use std::io::Write;

use anyhow::Result;
use giftbank_engine::gift::{CategoryIndex, plain_text_preview};
use giftbank_engine::{BankRepository, Category, QuestionBank, QuestionKind};

use super::Session;
use crate::cli::ListArgs;

const PREVIEW_CHARS: usize = 60;

pub fn handle<R: BankRepository>(
    args: &ListArgs,
    session: &Session<R>,
    out: &mut impl Write,
) -> Result<()> {
    let meta = session.bank_meta(args.bank.as_deref())?;
    let bank = session.open_bank(&meta)?;
    let index = CategoryIndex::new(bank.categories());

    if let Some(cycle) = index.find_cycle() {
        log::warn!("categories in a parent cycle are hidden: {}", cycle.join(" -> "));
    }

    writeln!(out, "{} [{}]", meta.name, meta.id)?;

    // Top level: no parent, or a parent that no longer exists
    let mut stack: Vec<(&Category, usize)> = bank
        .categories()
        .iter()
        .filter(|c| c.parent_id.as_deref().is_none_or(|p| index.get(p).is_none()))
        .rev()
        .map(|c| (c, 0))
        .collect();
    let mut seen = HashSet::new();

    while let Some((category, depth)) = stack.pop() {
        if !seen.insert(category.id.as_str()) {
            continue;
        }
        write_category(out, &bank, category, depth)?;
        for child in index.children(&category.id).iter().rev() {
            stack.push((*child, depth + 1));
        }
    }
    Ok(())
}

fn write_category(
    out: &mut impl Write,
    bank: &QuestionBank,
    category: &Category,
    depth: usize,
) -> Result<()> {
    let indent = "  ".repeat(depth);
    let count = bank.questions_in(&category.id).count();
    writeln!(
        out,
        "{indent}{} ({count} question(s)) [{}]",
        category.name.trim(),
        category.id
    )?;

    for question in bank.questions_in(&category.id) {
        let kind = match question.kind {
            QuestionKind::MultipleChoice if !question.has_correct_choice() => {
                "multiple choice, no correct choice"
            }
            QuestionKind::MultipleChoice => "multiple choice",
            QuestionKind::Essay => "essay",
        };
        writeln!(
            out,
            "{indent}  - {} ({kind}): {}",
            question.name,
            plain_text_preview(&question.content, PREVIEW_CHARS)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{memory_session, output};
    use giftbank_engine::{Choice, Question, ROOT_CATEGORY_ID};
    use pretty_assertions::assert_eq;

    fn cat(id: &str, name: &str, parent: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: Some(parent.to_string()),
        }
    }

    #[test]
    fn test_list_shows_tree_in_preorder() {
        let session = memory_session();
        let meta = session.bank_meta(None).unwrap();
        let mut bank = session.open_bank(&meta).unwrap();
        bank.bulk_import(
            vec![
                cat("m", "Math", ROOT_CATEGORY_ID),
                cat("h", "History", ROOT_CATEGORY_ID),
                cat("a", "Algebra", "m"),
            ],
            vec![
                Question::multiple_choice(
                    "m",
                    "Sum",
                    "<p>1 &amp; 1</p>",
                    vec![Choice::new("2", true)],
                ),
                Question::essay("a", "Proof", "<p>Show   that\nx = x</p>"),
            ],
        );
        session.save_bank(&meta, &bank).unwrap();
        let mut out = Vec::new();

        handle(&ListArgs { bank: None }, &session, &mut out).unwrap();

        assert_eq!(
            output(out),
            "Default Bank [default]\n\
             Default (0 question(s)) [root]\n\
             \x20 Math (1 question(s)) [m]\n\
             \x20   - Sum (multiple choice): 1 & 1\n\
             \x20   Algebra (1 question(s)) [a]\n\
             \x20     - Proof (essay): Show that x = x\n\
             \x20 History (0 question(s)) [h]\n"
        );
    }

    #[test]
    fn test_list_flags_choices_without_a_correct_answer() {
        let session = memory_session();
        let meta = session.bank_meta(None).unwrap();
        let mut bank = session.open_bank(&meta).unwrap();
        bank.bulk_import(
            Vec::new(),
            vec![Question::multiple_choice(
                ROOT_CATEGORY_ID,
                "Guess",
                "Pick one",
                vec![Choice::new("a", false), Choice::new("b", false)],
            )],
        );
        session.save_bank(&meta, &bank).unwrap();
        let mut out = Vec::new();

        handle(&ListArgs { bank: None }, &session, &mut out).unwrap();

        assert!(
            output(out).contains("  - Guess (multiple choice, no correct choice): Pick one\n")
        );
    }

    #[test]
    fn test_list_unknown_bank_fails() {
        let session = memory_session();
        let args = ListArgs {
            bank: Some("nope".to_string()),
        };

        assert!(handle(&args, &session, &mut Vec::new()).is_err());
    }
}
