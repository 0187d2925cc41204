//! Quiz history endpoint

use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/results
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ResultListResponse>> {
    let results = state.quiz.results(auth.user_id)?;
    Ok(Json(ResultListResponse { results }))
}
