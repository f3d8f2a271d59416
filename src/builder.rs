//! Turning raw text into questions: single entry, bulk import and export.

use std::fmt;

use crate::error::BuildError;
use crate::models::{Question, QuestionPart};
use crate::tokenizer::{tokenize_answer, tokenize_phonetic};

/// Build one question from a raw phonetic prompt and a raw answer.
pub fn build_question(raw_phonetic: &str, raw_answer: &str) -> Result<Question, BuildError> {
    let phonetic = tokenize_phonetic(raw_phonetic);
    let answer = tokenize_answer(raw_answer);

    if phonetic.is_empty() || answer.is_empty() {
        return Err(BuildError::EmptyInput);
    }
    if phonetic.len() != answer.len() {
        return Err(BuildError::LengthMismatch {
            phonetic: phonetic.len(),
            answer: answer.len(),
        });
    }

    let parts = phonetic
        .into_iter()
        .zip(answer)
        .map(|(p, a)| QuestionPart::new(p, a))
        .collect();
    Ok(Question::new(parts))
}

/// Why a single import line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportFailure {
    MissingColumns,
    Build(BuildError),
}

impl fmt::Display for ImportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumns => write!(f, "expected a phonetic and an answer column"),
            Self::Build(e) => write!(f, "{}", e),
        }
    }
}

/// A skipped line, numbered from 1 in the submitted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    pub line: usize,
    pub reason: ImportFailure,
}

/// Outcome of a bulk import. Never fails as a whole.
#[derive(Debug, Default)]
pub struct BulkImport {
    pub questions: Vec<Question>,
    pub error_count: usize,
    pub failures: Vec<LineFailure>,
}

impl BulkImport {
    /// Comma-separated line numbers of skipped lines.
    pub fn failed_lines(&self) -> String {
        self.failures
            .iter()
            .map(|f| f.line.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Import one question per line.
///
/// Columns are separated by a tab or by two or more spaces. The first
/// column is the phonetic prompt, the second the answer; any further
/// columns are ignored. Blank lines are skipped silently, every other
/// line that cannot become a question is counted and skipped.
pub fn import_bulk(raw_text: &str) -> BulkImport {
    let mut result = BulkImport::default();

    for (i, line) in raw_text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let columns = split_columns(line);
        let outcome = match columns.as_slice() {
            [phonetic, answer, ..] => build_question(phonetic, answer).map_err(ImportFailure::Build),
            _ => Err(ImportFailure::MissingColumns),
        };

        match outcome {
            Ok(question) => result.questions.push(question),
            Err(reason) => {
                tracing::debug!(line = i + 1, %reason, "skipping import line");
                result.error_count += 1;
                result.failures.push(LineFailure { line: i + 1, reason });
            }
        }
    }

    result
}

/// Split a line on tabs and on runs of two or more spaces, dropping empty
/// columns. A single space stays inside its column.
pub fn split_columns(line: &str) -> Vec<&str> {
    let mut columns = Vec::new();
    let mut start = 0;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let end = match c {
            '\t' => i + 1,
            ' ' if matches!(chars.peek(), Some((_, ' '))) => {
                let mut end = i + 1;
                while let Some(&(j, ' ')) = chars.peek() {
                    end = j + 1;
                    chars.next();
                }
                end
            }
            _ => continue,
        };
        columns.push(&line[start..i]);
        start = end;
    }
    columns.push(&line[start..]);

    columns
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Render questions as import-compatible lines: `phonetic<TAB>answer`.
///
/// Units are joined with single spaces, which both tokenizers split on, so
/// importing the output yields the same unit sequences.
pub fn export_tsv(questions: &[Question]) -> String {
    let mut out = String::new();
    for question in questions {
        out.push_str(&question.phonetic_text());
        out.push('\t');
        out.push_str(&question.answer_text());
        out.push('\n');
    }
    out
}
