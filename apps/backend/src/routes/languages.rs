//! Language and subcategory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/languages
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Json<LanguageListResponse> {
    let languages = state.vocabulary.languages(auth.user_id).await;
    Json(LanguageListResponse { languages })
}

/// POST /api/languages
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Result<StatusCode> {
    state.vocabulary.add_language(&req.name).await?;
    Ok(StatusCode::CREATED)
}

/// DELETE /api/languages/:language
pub async fn delete(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> Result<StatusCode> {
    state.vocabulary.delete_language(&language).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/languages/:language/subcategories
pub async fn create_subcategory(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Json(req): Json<NameRequest>,
) -> Result<StatusCode> {
    state.vocabulary.add_subcategory(&language, &req.name).await?;
    Ok(StatusCode::CREATED)
}

/// DELETE /api/languages/:language/subcategories/:subcategory
pub async fn delete_subcategory(
    State(state): State<AppState>,
    Path((language, subcategory)): Path<(String, String)>,
) -> Result<StatusCode> {
    state
        .vocabulary
        .delete_subcategory(&language, &subcategory)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
