//! In-memory question bank.
//!
//! `QuestionBank` owns one bank's categories and questions and is the only
//! place they are mutated. GIFT conversion works on snapshots of it; loading
//! and saving go through [`crate::io::BankRepository`].

use std::collections::HashSet;

use crate::gift::{self, CategoryIndex, ExportOptions, ValidationFinding, ValidationReport};
use crate::models::{BankSnapshot, Category, Question, ROOT_CATEGORY_ID};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Question not found: {0}")]
    QuestionNotFound(String),
    #[error("The root category cannot be {0}")]
    RootCategory(&'static str),
    #[error("Moving category {id} under {parent_id} would create a cycle")]
    Cycle { id: String, parent_id: String },
    #[error("Import blocked by {} error(s)", .0.iter().filter(|f| f.is_error()).count())]
    ImportBlocked(Vec<ValidationFinding>),
}

/// What an import added to the bank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories_added: usize,
    pub questions_added: usize,
    /// Warnings reported by the validator; they do not block the import
    pub warnings: Vec<ValidationFinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    categories: Vec<Category>,
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(snapshot: BankSnapshot) -> Self {
        Self {
            categories: snapshot.categories,
            questions: snapshot.questions,
        }
    }

    pub fn snapshot(&self) -> BankSnapshot {
        BankSnapshot {
            categories: self.categories.clone(),
            questions: self.questions.clone(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn questions_in<'a>(
        &'a self,
        category_id: &'a str,
    ) -> impl Iterator<Item = &'a Question> {
        self.questions
            .iter()
            .filter(move |q| q.category_id == category_id)
    }

    /// Add a category, returning its id
    pub fn add_category(
        &mut self,
        name: impl Into<String>,
        parent_id: Option<&str>,
    ) -> Result<String, StoreError> {
        if let Some(parent) = parent_id {
            self.require_category(parent)?;
        }
        let category = Category::new(name, parent_id.map(str::to_string));
        let id = category.id.clone();
        self.categories.push(category);
        Ok(id)
    }

    pub fn rename_category(
        &mut self,
        id: &str,
        name: impl Into<String>,
    ) -> Result<(), StoreError> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))?;
        category.name = name.into();
        Ok(())
    }

    /// Re-parent a category, refusing moves that would make it its own ancestor
    pub fn move_category(
        &mut self,
        id: &str,
        new_parent_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.require_category(id)?;
        if id == ROOT_CATEGORY_ID {
            return Err(StoreError::RootCategory("moved"));
        }
        if let Some(parent) = new_parent_id {
            self.require_category(parent)?;
            if CategoryIndex::new(&self.categories).is_ancestor_or_self(id, parent) {
                return Err(StoreError::Cycle {
                    id: id.to_string(),
                    parent_id: parent.to_string(),
                });
            }
        }

        if let Some(category) = self.categories.iter_mut().find(|c| c.id == id) {
            category.parent_id = new_parent_id.map(str::to_string);
        }
        Ok(())
    }

    /// Delete a category with all its descendants and their questions.
    ///
    /// Returns the ids of every removed category.
    pub fn delete_category(&mut self, id: &str) -> Result<Vec<String>, StoreError> {
        self.require_category(id)?;
        if id == ROOT_CATEGORY_ID {
            return Err(StoreError::RootCategory("deleted"));
        }

        let removed: Vec<String> = CategoryIndex::new(&self.categories)
            .descendants_preorder(id)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let doomed: HashSet<&str> = removed.iter().map(String::as_str).collect();

        self.categories.retain(|c| !doomed.contains(c.id.as_str()));
        self.questions
            .retain(|q| !doomed.contains(q.category_id.as_str()));
        log::debug!("deleted {} categories under {id}", removed.len());
        Ok(removed)
    }

    /// Insert a new question or replace the one with the same id
    pub fn save_question(&mut self, question: Question) -> Result<(), StoreError> {
        self.require_category(&question.category_id)?;
        match self.questions.iter_mut().find(|q| q.id == question.id) {
            Some(existing) => *existing = question,
            None => self.questions.push(question),
        }
        Ok(())
    }

    pub fn delete_question(&mut self, id: &str) -> Result<Question, StoreError> {
        let index = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| StoreError::QuestionNotFound(id.to_string()))?;
        Ok(self.questions.remove(index))
    }

    pub fn move_question(&mut self, id: &str, category_id: &str) -> Result<(), StoreError> {
        self.require_category(category_id)?;
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| StoreError::QuestionNotFound(id.to_string()))?;
        question.category_id = category_id.to_string();
        Ok(())
    }

    /// Append imported records.
    ///
    /// Categories whose id already exists are skipped; questions are always
    /// appended. Returns `(categories added, questions added)`.
    pub fn bulk_import(
        &mut self,
        categories: Vec<Category>,
        questions: Vec<Question>,
    ) -> (usize, usize) {
        let known: HashSet<String> = self.categories.iter().map(|c| c.id.clone()).collect();
        let before = self.categories.len();
        for category in categories {
            if !known.contains(&category.id) {
                self.categories.push(category);
            }
        }
        let added = self.categories.len() - before;
        let question_count = questions.len();
        self.questions.extend(questions);
        (added, question_count)
    }

    /// Validate `text` and import it unless the validator reports an error.
    pub fn import_gift(&mut self, text: &str) -> Result<ImportSummary, StoreError> {
        let report = ValidationReport::new(text);
        if report.has_errors() {
            log::warn!(
                "import blocked: {} error(s) in GIFT input",
                report.errors().count()
            );
            return Err(StoreError::ImportBlocked(report.findings));
        }

        let parsed = gift::parse::parse_against(text, &self.categories);
        let (categories_added, questions_added) =
            self.bulk_import(parsed.categories, parsed.questions);
        log::info!("imported {questions_added} questions, {categories_added} new categories");

        Ok(ImportSummary {
            categories_added,
            questions_added,
            warnings: report.warnings().cloned().collect(),
        })
    }

    pub fn export_gift(&self, options: &ExportOptions) -> String {
        gift::export(&self.categories, &self.questions, options)
    }

    fn require_category(&self, id: &str) -> Result<(), StoreError> {
        self.category(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::CategoryNotFound(id.to_string()))
    }
}
