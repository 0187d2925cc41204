//! Quiz endpoints

use axum::{extract::State, Extension, Json};
use lexicard_core::StoreError;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// POST /api/quiz
pub async fn start(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<StartQuizRequest>,
) -> Result<Json<QuizView>> {
    if !state
        .vocabulary
        .has_subcategory(&req.language, &req.subcategory)
        .await
    {
        return Err(StoreError::SubcategoryNotFound {
            language: req.language,
            subcategory: req.subcategory,
        }
        .into());
    }

    let cards = state
        .vocabulary
        .list_flashcards(&req.language, &req.subcategory, None, Some(auth.user_id))
        .await;
    let view = state
        .quiz
        .start(auth.user_id, cards, req.mode, req.shuffle)
        .await?;
    Ok(Json(view))
}

/// GET /api/quiz
pub async fn current(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<QuizView>> {
    Ok(Json(state.quiz.current(auth.user_id).await?))
}

/// POST /api/quiz/answer
pub async fn answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>> {
    Ok(Json(state.quiz.answer(auth.user_id, &req.answer).await?))
}

/// POST /api/quiz/choice
pub async fn choose(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(req): Json<ChoiceRequest>,
) -> Result<Json<AnswerResponse>> {
    Ok(Json(state.quiz.choose(auth.user_id, req.index).await?))
}
