//! Persistence backends.
//!
//! Both backends store the whole vocabulary at once: every mutation rewrites
//! the full store. Users and quiz results are appended individually.

pub mod json;
pub mod schema;
pub mod sqlite;

use lexicard_core::{QuizResult, VocabularyStore};
use thiserror::Error;

use crate::models::{NewQuizResult, NewUser, User};

pub use json::JsonStorage;
pub use sqlite::SqliteStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Persistence for vocabulary, accounts and quiz history.
pub trait Storage: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &'static str;

    fn load_vocabulary(&self) -> Result<VocabularyStore>;

    /// Replace the persisted vocabulary with `store`.
    fn save_vocabulary(&self, store: &VocabularyStore) -> Result<()>;

    /// Insert a user. Fails with `DuplicateUsername` if the name is taken.
    fn create_user(&self, user: &NewUser) -> Result<User>;

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    fn get_user(&self, id: i64) -> Result<Option<User>>;

    fn append_quiz_result(&self, result: &NewQuizResult) -> Result<QuizResult>;

    /// Quiz history of a user, newest first.
    fn quiz_results(&self, user_id: i64) -> Result<Vec<QuizResult>>;
}
