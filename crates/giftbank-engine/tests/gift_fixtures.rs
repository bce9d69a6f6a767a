use chrono::{TimeZone, Utc};
use giftbank_engine::gift::{self, CategoryIndex, ExportOptions, ParsedBank};
use giftbank_engine::{Category, Choice, Question, QuestionKind, ROOT_CATEGORY_ID};

#[test]
fn fixture_valid_parses() {
    let text = read_fixture("valid.gift");
    let parsed = gift::parse(&text);

    assert!(!gift::ValidationReport::new(&text).has_errors());
    assert_fixture_snapshot("valid", render_parsed(&parsed));
}

#[test]
fn fixture_problems_validation_report() {
    let text = read_fixture("problems.gift");
    let rendered = gift::validate(&text)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");

    assert_fixture_snapshot("problems", rendered);
}

#[test]
fn fixture_course_export() {
    let (categories, questions) = course_bank();
    let output = gift::export(
        &categories,
        &questions,
        &ExportOptions {
            scope: None,
            context_prefix: Some("top/Course"),
        },
    );

    assert_fixture_snapshot("course_export", output);
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("{}/{name}", fixtures_dir())).unwrap()
}

fn fixtures_dir() -> String {
    format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"))
}

fn assert_fixture_snapshot(name: &str, value: String) {
    let dir = fixtures_dir();
    insta::with_settings!({
        snapshot_path => dir.as_str(),
        prepend_module_to_snapshot => false,
    }, {
        insta::assert_snapshot!(name, value);
    });
}

/// Human-readable dump of parse output; ids and timestamps are left out.
fn render_parsed(parsed: &ParsedBank) -> String {
    let index = CategoryIndex::new(&parsed.categories);
    let path = |id: &str| match index.path_of(id).as_deref() {
        Some("") => "(root)".to_string(),
        Some(p) => p.to_string(),
        None => "(unresolved)".to_string(),
    };

    let mut lines = vec!["categories:".to_string()];
    for category in &parsed.categories {
        lines.push(format!("  {}", path(&category.id)));
    }
    lines.push("questions:".to_string());
    for q in &parsed.questions {
        lines.push(format!(
            "  [{}] {} ({:?})",
            path(&q.category_id),
            q.name,
            q.kind
        ));
        lines.push(format!("    {}", q.content));
        for choice in &q.choices {
            let marker = if choice.is_correct { '=' } else { '~' };
            lines.push(format!("    {marker} {}", choice.text));
        }
    }
    lines.join("\n")
}

fn course_bank() -> (Vec<Category>, Vec<Question>) {
    let cat = |id: &str, name: &str, parent: &str| Category {
        id: id.to_string(),
        name: name.to_string(),
        parent_id: Some(parent.to_string()),
    };
    let categories = vec![
        Category::root("Default"),
        cat("c-math", "Math", ROOT_CATEGORY_ID),
        cat("c-alg", "Algebra", "c-math"),
        cat("c-hist", "History", ROOT_CATEGORY_ID),
    ];

    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let choice = |id: &str, text: &str, is_correct: bool| Choice {
        id: id.to_string(),
        text: text.to_string(),
        is_correct,
    };
    let questions = vec![
        Question {
            id: "11111111-aaaa".to_string(),
            category_id: "c-math".to_string(),
            name: "Sum".to_string(),
            content: r#"<p style="color:red">1 + 1 = ?</p>"#.to_string(),
            kind: QuestionKind::MultipleChoice,
            choices: vec![choice("a1", "2", true), choice("a2", "3", false)],
            created_at,
        },
        Question {
            id: "22222222-bbbb".to_string(),
            category_id: "c-alg".to_string(),
            name: "Prove it".to_string(),
            content: "Show that x: x = x".to_string(),
            kind: QuestionKind::Essay,
            choices: Vec::new(),
            created_at,
        },
        Question {
            id: "33333333-cccc".to_string(),
            category_id: "c-hist".to_string(),
            name: "Year {of} war".to_string(),
            content: "When?".to_string(),
            kind: QuestionKind::MultipleChoice,
            choices: vec![choice("b1", "1914", true), choice("b2", "1918", false)],
            created_at,
        },
    ];

    (categories, questions)
}
