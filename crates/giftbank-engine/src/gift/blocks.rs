//! Splitting GIFT source into logical blocks.
//!
//! Both the parser and the validator walk the output of [`segment`], so a
//! block means the same thing to both:
//!
//! 1. Runs of blank lines separate chunks.
//! 2. Inside a chunk every `$CATEGORY:` line is its own [`Segment::Category`];
//!    question lines collected before it are flushed first.
//! 3. Lines starting with `//` before the first question line of a chunk are
//!    comments, unless they carry a `::` title marker. Later `//` lines are
//!    question text (HTML content may legitimately contain them).
//! 4. A question segment with no lines left is dropped.

use super::escape::find_unescaped;

/// Marker that starts a category directive line.
pub const CATEGORY_DIRECTIVE: &str = "$CATEGORY:";

/// A line of source text with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// The non-comment lines of one question block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionLines<'a> {
    pub lines: Vec<SourceLine<'a>>,
}

impl QuestionLines<'_> {
    /// Line number of the first line in the block.
    pub fn start_line(&self) -> usize {
        self.lines.first().map(|l| l.number).unwrap_or(1)
    }

    /// The block's lines joined with `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line.text);
        }
        out
    }

    /// Source line holding byte `offset` of [`QuestionLines::text`].
    pub fn line_at_offset(&self, offset: usize) -> SourceLine<'_> {
        let mut end = 0;
        for line in &self.lines {
            end += line.text.len() + 1;
            if offset < end {
                return *line;
            }
        }
        self.lines.last().copied().unwrap_or(SourceLine {
            number: 1,
            text: "",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A `$CATEGORY:` directive; `path` is the trimmed text after the marker.
    Category {
        line: SourceLine<'a>,
        path: &'a str,
    },
    Question(QuestionLines<'a>),
}

/// Splits `text` into category directives and question blocks, in order.
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut pending: Vec<SourceLine> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = SourceLine {
            number: index + 1,
            text: raw,
        };
        let trimmed = raw.trim_start();

        if trimmed.trim_end().is_empty() {
            flush(&mut pending, &mut segments);
        } else if let Some(rest) = trimmed.strip_prefix(CATEGORY_DIRECTIVE) {
            flush(&mut pending, &mut segments);
            segments.push(Segment::Category {
                line,
                path: rest.trim(),
            });
        } else if !(pending.is_empty() && is_leading_comment(raw)) {
            pending.push(line);
        }
    }
    flush(&mut pending, &mut segments);

    segments
}

/// Whether a line is a `//` comment.
fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

fn is_leading_comment(line: &str) -> bool {
    is_comment(line) && find_unescaped(line, "::").is_none()
}

fn flush<'a>(pending: &mut Vec<SourceLine<'a>>, segments: &mut Vec<Segment<'a>>) {
    if !pending.is_empty() {
        segments.push(Segment::Question(QuestionLines {
            lines: std::mem::take(pending),
        }));
    }
}
