//! Structural checks on GIFT text, reported against source line numbers.
//!
//! Validation is independent of parsing: it never builds records and is safe
//! to run on any text, including text the parser would mangle. Errors mean
//! the text must not be imported; warnings are advisory.

use std::fmt;

use serde::Serialize;

use super::blocks::{self, QuestionLines, Segment, SourceLine};
use super::escape::{find_unescaped, rfind_unescaped};

/// Longest excerpt, in characters, before it is cut with "..."
pub const EXCERPT_LEN: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One problem found in GIFT source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFinding {
    /// 1-based source line
    pub line: usize,
    pub severity: Severity,
    pub message: String,
    /// The offending line, trimmed and shortened
    pub excerpt: String,
}

impl ValidationFinding {
    fn at(line: SourceLine, severity: Severity, message: &str) -> Self {
        Self {
            line: line.number,
            severity,
            message: message.to_string(),
            excerpt: excerpt(line.text),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity, self.message)?;
        if !self.excerpt.is_empty() {
            write!(f, " ({})", self.excerpt)?;
        }
        Ok(())
    }
}

/// Checks every block of `text` and returns findings in source order.
pub fn validate(text: &str) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    for segment in blocks::segment(text) {
        match segment {
            Segment::Category { line, path } => {
                if path.is_empty() {
                    findings.push(ValidationFinding::at(
                        line,
                        Severity::Error,
                        "Category directive has no path",
                    ));
                }
            }
            Segment::Question(lines) => check_question(&lines, &mut findings),
        }
    }
    findings
}

fn check_question(lines: &QuestionLines, findings: &mut Vec<ValidationFinding>) {
    let text = lines.text();
    let first_line = lines.line_at_offset(0);
    let open = find_unescaped(&text, "{");

    let head = &text[..open.unwrap_or(text.len())];
    if !has_title(head) {
        findings.push(ValidationFinding::at(
            first_line,
            Severity::Error,
            "Missing question title (::title::)",
        ));
    }

    let Some(open) = open else {
        findings.push(ValidationFinding::at(
            first_line,
            Severity::Error,
            "Missing opening brace '{'",
        ));
        return;
    };
    let open_line = lines.line_at_offset(open);

    let after = &text[open + 1..];
    let Some(close) = rfind_unescaped(after, "}") else {
        findings.push(ValidationFinding::at(
            open_line,
            Severity::Error,
            "Missing closing brace '}'",
        ));
        return;
    };

    let inner = after[..close].trim();
    if inner.is_empty() {
        return;
    }

    let has_correct = find_unescaped(inner, "=").is_some();
    let has_wrong = find_unescaped(inner, "~").is_some();
    if has_wrong && !has_correct {
        findings.push(ValidationFinding::at(
            open_line,
            Severity::Warning,
            "Multiple-choice answers have no correct choice (=)",
        ));
    } else if !has_wrong && !has_correct {
        findings.push(ValidationFinding::at(
            first_line,
            Severity::Warning,
            "Unrecognized answer format: expected =correct or ~wrong choices",
        ));
    }
}

fn has_title(head: &str) -> bool {
    find_unescaped(head, "::")
        .and_then(|start| find_unescaped(&head[start + 2..], "::"))
        .is_some()
}

fn excerpt(line: &str) -> String {
    let line = line.trim();
    if line.chars().count() > EXCERPT_LEN {
        let mut s: String = line.chars().take(EXCERPT_LEN).collect();
        s.push_str("...");
        s
    } else {
        line.to_string()
    }
}

/// Findings for one text, with the import gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<ValidationFinding>,
}

impl ValidationReport {
    pub fn new(text: &str) -> Self {
        Self {
            findings: validate(text),
        }
    }

    /// Import is refused while this is true
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(ValidationFinding::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}
