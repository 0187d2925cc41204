//! Authentication middleware and account endpoints

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// Authenticated user stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

/// Auth middleware - resolves the bearer token to a logged-in user
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?
        .trim()
        .to_string();

    let user = state.accounts.authenticate(&token).await?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        token,
    });

    Ok(next.run(request).await)
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let (token, user) = state.accounts.register(&req).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.to_info(),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (token, user) = state.accounts.login(&req).await?;
    Ok(Json(AuthResponse {
        token,
        user: user.to_info(),
    }))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> StatusCode {
    state.accounts.logout(&auth.token).await;
    StatusCode::NO_CONTENT
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<UserInfo>> {
    let user = state.accounts.authenticate(&auth.token).await?;
    Ok(Json(user.to_info()))
}
