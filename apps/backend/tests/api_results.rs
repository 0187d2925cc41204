//! Quiz results API tests.

mod common;

use axum::http::header::AUTHORIZATION;
use axum_test::TestServer;
use serde_json::{json, Value};

use common::fixtures::{self, ANIMALS};
use common::TestContext;

/// Run an open-answer quiz over the seeded animals with the given answers.
async fn play(server: &TestServer, auth: &str, answers: &[&str]) {
    server
        .post("/api/quiz")
        .add_header(AUTHORIZATION, auth.to_string())
        .json(&json!({
            "language": "English",
            "subcategory": "animals",
            "shuffle": false,
        }))
        .await
        .assert_status_ok();

    for answer in answers {
        server
            .post("/api/quiz/answer")
            .add_header(AUTHORIZATION, auth.to_string())
            .json(&json!({ "answer": answer }))
            .await
            .assert_status_ok();
    }
}

#[tokio::test]
async fn test_results_start_empty() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let token = TestContext::register(&server, "anna").await;

    let response = server
        .get("/api/results")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_finished_quizzes_are_listed_newest_first() {
    for ctx in [TestContext::new(), TestContext::sqlite()] {
        let server = ctx.server();
        let token = TestContext::register(&server, "anna").await;
        let auth = TestContext::auth_header_value(&token);
        fixtures::seed_subcategory(&server, &token, "English", "animals", ANIMALS).await;

        play(&server, &auth, &["cat", "dog", "x", "y"]).await;
        play(&server, &auth, &["cat", "dog", "horse", "fish"]).await;
        // Unfinished quizzes are not recorded.
        play(&server, &auth, &["cat"]).await;

        let body: Value = server
            .get("/api/results")
            .add_header(AUTHORIZATION, auth)
            .await
            .json();
        let results = body["results"].as_array().unwrap();

        assert_eq!(results.len(), 2, "backend {}", ctx.storage.name());
        assert_eq!(results[0]["correct_answers"], 4);
        assert_eq!(results[0]["wrong_answers"], 0);
        assert_eq!(results[0]["total_points"], 4);
        assert_eq!(results[1]["correct_answers"], 2);
        assert_eq!(results[1]["wrong_answers"], 2);
        assert_eq!(results[1]["total_points"], 0);
    }
}

#[tokio::test]
async fn test_results_are_private() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let anna = TestContext::register(&server, "anna").await;
    let bob = TestContext::register(&server, "bob").await;
    fixtures::seed_subcategory(&server, &anna, "English", "animals", ANIMALS).await;

    play(&server, &TestContext::auth_header_value(&anna), &["a", "b", "c", "d"]).await;

    let body: Value = server
        .get("/api/results")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&bob))
        .await
        .json();
    assert!(body["results"].as_array().unwrap().is_empty());

    let body: Value = server
        .get("/api/results")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&anna))
        .await
        .json();
    assert_eq!(body["results"][0]["total_points"], -4);
}
