//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext backed by a temporary JSON directory or in-memory SQLite
//! - Offline translator and sentence generator fakes
//! - Authentication helpers

pub mod fixtures;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use lexicard_backend::services::sentences::GENERATION_FAILED;
use lexicard_backend::services::{QuizService, SentenceGenerator, Translator};
use lexicard_backend::storage::{JsonStorage, SqliteStorage, Storage};
use lexicard_backend::{build_router, AppState};

/// Translator that knows a handful of words and echoes everything else,
/// like the real client does when the service is unreachable.
pub struct FakeTranslator;

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, target_code: &str) -> String {
        match (text, target_code) {
            ("kot", "en") => "cat".to_string(),
            ("pies", "en") => "dog".to_string(),
            ("kot", "de") => "Katze".to_string(),
            _ => text.to_string(),
        }
    }
}

/// Generator that builds a sentence from the word, failing for "fail".
pub struct FakeGenerator;

#[async_trait]
impl SentenceGenerator for FakeGenerator {
    async fn generate_example(&self, word: &str, _language: &str) -> String {
        if word == "fail" {
            GENERATION_FAILED.to_string()
        } else {
            format!("This is {word}.")
        }
    }
}

/// Test context holding the app state and its storage.
pub struct TestContext {
    pub state: AppState,
    pub storage: Arc<dyn Storage>,
    _dir: Option<TempDir>,
    app: Router,
}

impl TestContext {
    /// Context with JSON storage in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage: Arc<dyn Storage> =
            Arc::new(JsonStorage::open(dir.path()).expect("Failed to open JSON storage"));
        Self::with_storage(storage, Some(dir), 30)
    }

    /// Context with an in-memory SQLite database.
    pub fn sqlite() -> Self {
        let storage: Arc<dyn Storage> =
            Arc::new(SqliteStorage::open_in_memory().expect("Failed to open SQLite storage"));
        Self::with_storage(storage, None, 30)
    }

    /// Context with JSON storage and a custom per-question time limit.
    pub fn with_seconds_per_question(seconds: u32) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let storage: Arc<dyn Storage> =
            Arc::new(JsonStorage::open(dir.path()).expect("Failed to open JSON storage"));
        Self::with_storage(storage, Some(dir), seconds)
    }

    fn with_storage(storage: Arc<dyn Storage>, dir: Option<TempDir>, seconds: u32) -> Self {
        let state = AppState::new(
            storage.clone(),
            Arc::new(FakeTranslator),
            Arc::new(FakeGenerator),
            seconds,
        )
        .expect("Failed to build app state");
        let app = build_router(state.clone());

        Self {
            state,
            storage,
            _dir: dir,
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }

    pub fn quiz(&self) -> Arc<QuizService> {
        self.state.quiz.clone()
    }

    /// Rebuild the app over the same storage, as after a restart.
    pub fn restart(&self) -> TestServer {
        let state = AppState::new(
            self.storage.clone(),
            Arc::new(FakeTranslator),
            Arc::new(FakeGenerator),
            30,
        )
        .expect("Failed to rebuild app state");
        TestServer::new(build_router(state)).unwrap()
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Register a user and return their session token.
    pub async fn register(server: &TestServer, username: &str) -> String {
        let response = server
            .post("/api/auth/register")
            .json(&fixtures::register_request(username, "secret"))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        body["token"].as_str().unwrap().to_string()
    }
}
