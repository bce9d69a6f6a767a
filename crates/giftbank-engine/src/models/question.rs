use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The question kinds that survive a GIFT round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    MultipleChoice,
    Essay,
}

/// One answer option of a multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    /// HTML fragment
    pub text: String,
    pub is_correct: bool,
}

impl Choice {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            is_correct,
        }
    }
}

/// A question stored in exactly one category.
///
/// More than one choice may be flagged correct; the editor only ever produces
/// one but imported GIFT can carry several and they are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub category_id: String,
    pub name: String,
    /// HTML fragment
    pub content: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Build a multiple-choice question with a fresh id and timestamp
    pub fn multiple_choice(
        category_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category_id: category_id.into(),
            name: name.into(),
            content: content.into(),
            kind: QuestionKind::MultipleChoice,
            choices,
            created_at: Utc::now(),
        }
    }

    /// Build an essay question with a fresh id and timestamp
    pub fn essay(
        category_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category_id: category_id.into(),
            name: name.into(),
            content: content.into(),
            kind: QuestionKind::Essay,
            choices: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn has_correct_choice(&self) -> bool {
        self.choices.iter().any(|c| c.is_correct)
    }
}
