//! Core types for the vocabulary application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A word with its translation and an example sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub example_sentence: String,
    /// Owning user. Cards without an owner are shared.
    #[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
}

impl Flashcard {
    pub fn new(
        word: impl Into<String>,
        translation: impl Into<String>,
        example_sentence: impl Into<String>,
        owner_id: Option<i64>,
    ) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
            example_sentence: example_sentence.into(),
            owner_id,
        }
    }

    /// Whether `viewer` may see this card. `None` sees everything.
    pub fn visible_to(&self, viewer: Option<i64>) -> bool {
        match (viewer, self.owner_id) {
            (None, _) | (_, None) => true,
            (Some(viewer), Some(owner)) => viewer == owner,
        }
    }

    /// Case-insensitive substring match against word or translation.
    pub fn matches_filter(&self, needle_lower: &str) -> bool {
        self.word.to_lowercase().contains(needle_lower)
            || self.translation.to_lowercase().contains(needle_lower)
    }
}

/// Quiz answer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    OpenAnswer,
    MultipleChoice,
}

impl Default for QuizMode {
    fn default() -> Self {
        Self::OpenAnswer
    }
}

impl QuizMode {
    /// Minimum number of flashcards needed to start a quiz in this mode.
    pub fn min_flashcards(self) -> usize {
        match self {
            Self::OpenAnswer => 1,
            Self::MultipleChoice => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAnswer => "open_answer",
            Self::MultipleChoice => "multiple_choice",
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subcategory name with the number of flashcards it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryInfo {
    pub name: String,
    pub flashcard_count: usize,
}

/// A finished quiz as recorded in the results log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub user_id: i64,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub date: DateTime<Utc>,
}

impl QuizResult {
    /// Correct answers minus wrong answers.
    pub fn total_points(&self) -> i64 {
        i64::from(self.correct_answers) - i64::from(self.wrong_answers)
    }
}
