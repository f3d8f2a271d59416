//! Data models for questions and the question collection.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One aligned pair: a phonetic prompt unit and the answer unit it hides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPart {
    pub phonetic: String,
    pub answer: String,
    /// Transient; cleared when a game session starts.
    #[serde(default)]
    pub revealed: bool,
}

impl QuestionPart {
    pub fn new(phonetic: String, answer: String) -> Self {
        Self {
            phonetic,
            answer,
            revealed: false,
        }
    }

    /// Text currently shown on this part's card.
    pub fn face(&self) -> &str {
        if self.revealed {
            &self.answer
        } else {
            &self.phonetic
        }
    }
}

/// A guessing round: an ordered, non-empty row of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub parts: Vec<QuestionPart>,
    pub created_at: DateTime<Local>,
}

impl Question {
    /// Callers guarantee `parts` is non-empty; see `builder::build_question`.
    pub fn new(parts: Vec<QuestionPart>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            parts,
            created_at: Local::now(),
        }
    }

    /// Flip a single part. Returns the new flag, or `None` if out of range.
    pub fn toggle_reveal(&mut self, index: usize) -> Option<bool> {
        let part = self.parts.get_mut(index)?;
        part.revealed = !part.revealed;
        Some(part.revealed)
    }

    pub fn reveal_all(&mut self) {
        for part in &mut self.parts {
            part.revealed = true;
        }
    }

    pub fn reset_reveals(&mut self) {
        for part in &mut self.parts {
            part.revealed = false;
        }
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.parts.iter().all(|p| p.revealed)
    }

    /// Prompt units joined by single spaces.
    pub fn phonetic_text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.phonetic.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Answer units joined by single spaces.
    pub fn answer_text(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.answer.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The question collection. Sole owner of every question and part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Question> {
        self.questions.get_mut(index)
    }

    pub fn push(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub fn extend(&mut self, questions: impl IntoIterator<Item = Question>) {
        self.questions.extend(questions);
    }

    /// Remove a question by id. Returns the removed question if it existed.
    pub fn remove(&mut self, id: &str) -> Option<Question> {
        let pos = self.questions.iter().position(|q| q.id == id)?;
        Some(self.questions.remove(pos))
    }

    /// Clear every reveal flag in the collection.
    pub fn reset_reveals(&mut self) {
        for question in &mut self.questions {
            question.reset_reveals();
        }
    }

    /// Every structural invariant holds: ids are non-empty and unique,
    /// and no question is empty.
    pub fn is_well_formed(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.questions
            .iter()
            .all(|q| !q.id.is_empty() && !q.parts.is_empty() && seen.insert(q.id.as_str()))
    }
}

impl FromIterator<Question> for QuestionBank {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        Self {
            questions: iter.into_iter().collect(),
        }
    }
}
