//! Error types for lexicard-core.

use crate::types::QuizMode;
use thiserror::Error;

/// Errors raised by vocabulary store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{field} is required")]
    EmptyField { field: &'static str },

    #[error("language already exists: {0}")]
    LanguageExists(String),

    #[error("language not found: {0}")]
    LanguageNotFound(String),

    #[error("subcategory already exists: {language}/{subcategory}")]
    SubcategoryExists { language: String, subcategory: String },

    #[error("subcategory not found: {language}/{subcategory}")]
    SubcategoryNotFound { language: String, subcategory: String },

    #[error("flashcard not found: {word}")]
    FlashcardNotFound { word: String },
}

/// Errors raised by quiz sessions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("{mode} quiz needs at least {required} flashcards, found {available}")]
    NotEnoughFlashcards {
        mode: QuizMode,
        required: usize,
        available: usize,
    },

    #[error("multiple choice quiz needs at least 4 different translations, found {available}")]
    NotEnoughDistinctAnswers { available: usize },

    #[error("no quiz in progress")]
    NotInProgress,

    #[error("current question is not multiple choice")]
    NotMultipleChoice,

    #[error("invalid choice {index}, expected 0..{count}")]
    InvalidChoice { index: usize, count: usize },
}
