//! Test fixtures and factory functions for creating test data.

use axum_test::TestServer;
use serde_json::{json, Value};

use super::TestContext;

pub fn register_request(username: &str, password: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": password,
    })
}

pub fn flashcard_request(word: &str, translation: &str, example: &str) -> Value {
    json!({
        "word": word,
        "translation": translation,
        "example_sentence": example,
    })
}

/// URL of a subcategory's flashcard collection.
pub fn flashcards_url(language: &str, subcategory: &str) -> String {
    format!("/api/languages/{language}/subcategories/{subcategory}/flashcards")
}

/// Create a language and subcategory, then add `(word, translation)` cards.
pub async fn seed_subcategory(
    server: &TestServer,
    token: &str,
    language: &str,
    subcategory: &str,
    cards: &[(&str, &str)],
) {
    let auth = TestContext::auth_header_value(token);

    let _ = server
        .post("/api/languages")
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&json!({ "name": language }))
        .await;

    server
        .post(&format!("/api/languages/{language}/subcategories"))
        .add_header(axum::http::header::AUTHORIZATION, auth.clone())
        .json(&json!({ "name": subcategory }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    for (word, translation) in cards {
        server
            .post(&flashcards_url(language, subcategory))
            .add_header(axum::http::header::AUTHORIZATION, auth.clone())
            .json(&flashcard_request(word, translation, "Example."))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }
}

/// Four cards with distinct translations.
pub const ANIMALS: &[(&str, &str)] = &[
    ("kot", "cat"),
    ("pies", "dog"),
    ("koń", "horse"),
    ("ryba", "fish"),
];
