//! Storage entities and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export shared types from lexicard-core
pub use lexicard_core::{
    AnswerOutcome, Flashcard, QuestionView, QuizMode, QuizResult, QuizState, QuizSummary,
    SubcategoryInfo,
};

// === Storage Entity Types ===

/// Registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    pub username: String,
    pub email: String,
    /// SHA-256 hex digest of the password
    pub password: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// User about to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Quiz result about to be appended to the log
#[derive(Debug, Clone)]
pub struct NewQuizResult {
    pub user_id: i64,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub date: DateTime<Utc>,
}

// === Auth API Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Public account info (never includes the password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

// === Vocabulary API Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct NameRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub name: String,
    pub subcategories: Vec<SubcategoryInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguageListResponse {
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FlashcardQuery {
    /// Case-insensitive search in word or translation
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlashcardListResponse {
    pub language: String,
    pub subcategory: String,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFlashcardRequest {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub example_sentence: String,
    /// Fill an empty translation through the translation service
    #[serde(default)]
    pub auto_translate: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateFlashcardRequest {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub example_sentence: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteFlashcardResponse {
    pub deleted: usize,
}

// === Quiz API Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct StartQuizRequest {
    pub language: String,
    pub subcategory: String,
    #[serde(default)]
    pub mode: QuizMode,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
}

fn default_shuffle() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChoiceRequest {
    pub index: usize,
}

/// Snapshot of the caller's quiz
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizView {
    pub mode: QuizMode,
    pub state: QuizState,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub unanswered_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<QuizSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub outcome: AnswerOutcome,
    pub quiz: QuizView,
}

// === Results API Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultEntry {
    pub date: DateTime<Utc>,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    pub total_points: i64,
}

impl From<&QuizResult> for ResultEntry {
    fn from(result: &QuizResult) -> Self {
        Self {
            date: result.date,
            correct_answers: result.correct_answers,
            wrong_answers: result.wrong_answers,
            total_points: result.total_points(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultListResponse {
    pub results: Vec<ResultEntry>,
}
