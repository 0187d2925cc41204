//! Flashcard endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use lexicard_core::StoreError;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::vocabulary::compose_flashcard;
use crate::AppState;

/// GET /api/languages/:language/subcategories/:subcategory/flashcards
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((language, subcategory)): Path<(String, String)>,
    Query(query): Query<FlashcardQuery>,
) -> Json<FlashcardListResponse> {
    let flashcards = state
        .vocabulary
        .list_flashcards(&language, &subcategory, query.q.as_deref(), Some(auth.user_id))
        .await;

    Json(FlashcardListResponse {
        language,
        subcategory,
        flashcards,
    })
}

/// POST /api/languages/:language/subcategories/:subcategory/flashcards
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((language, subcategory)): Path<(String, String)>,
    Json(req): Json<CreateFlashcardRequest>,
) -> Result<(StatusCode, Json<Flashcard>)> {
    if !state.vocabulary.has_subcategory(&language, &subcategory).await {
        return Err(StoreError::SubcategoryNotFound {
            language,
            subcategory,
        }
        .into());
    }

    let card = compose_flashcard(
        &language,
        req,
        auth.user_id,
        state.translator.as_ref(),
        state.sentences.as_ref(),
    )
    .await?;

    let card = state
        .vocabulary
        .add_flashcard(&language, &subcategory, card)
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /api/languages/:language/subcategories/:subcategory/flashcards/:word
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((language, subcategory, word)): Path<(String, String, String)>,
    Json(req): Json<UpdateFlashcardRequest>,
) -> Result<Json<Flashcard>> {
    let new_word = req.word.trim();
    let translation = req.translation.trim();
    if new_word.is_empty() || translation.is_empty() {
        return Err(ApiError::Validation(
            "word and translation are required".to_string(),
        ));
    }

    let card = Flashcard::new(
        new_word,
        translation,
        req.example_sentence.trim(),
        Some(auth.user_id),
    );
    let card = state
        .vocabulary
        .edit_flashcard(&language, &subcategory, &word, Some(auth.user_id), card)
        .await?;
    Ok(Json(card))
}

/// DELETE /api/languages/:language/subcategories/:subcategory/flashcards/:word
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path((language, subcategory, word)): Path<(String, String, String)>,
) -> Result<Json<DeleteFlashcardResponse>> {
    let deleted = state
        .vocabulary
        .delete_flashcard(&language, &subcategory, &word, Some(auth.user_id))
        .await?;
    Ok(Json(DeleteFlashcardResponse { deleted }))
}
