//! Core vocabulary library shared by the backend service.
//!
//! Provides:
//! - Vocabulary store (language -> subcategory -> flashcards)
//! - Timed quiz sessions (open answer and multiple choice)
//! - Answer matching (trimmed, case-insensitive)
//! - Language name to translation code lookup
//! - Shared types (Flashcard, QuizMode, QuizResult, etc.)

pub mod error;
pub mod language;
pub mod matching;
pub mod quiz;
pub mod store;
pub mod types;

pub use error::{QuizError, StoreError};
pub use language::{language_code, try_language_code};
pub use matching::{compare_answers, MatchResult};
pub use quiz::{AnswerOutcome, QuestionView, QuizSession, QuizState, QuizSummary, TickOutcome};
pub use store::VocabularyStore;
pub use types::{Flashcard, QuizMode, QuizResult, SubcategoryInfo};
