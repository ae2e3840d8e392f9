//! Authentication routes: sign-in and sign-up through Directus.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::gateway::directus::AuthTokens;
use crate::models::user::{LoginRequest, RegisterRequest};
use crate::services::auth as auth_service;
use crate::AppState;

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthTokens>>, AppError> {
    let tokens = auth_service::login(&state.directus, &body).await?;
    Ok(ApiResponse::success(tokens))
}

/// POST /api/v1/auth/register — create the account, sign in and set the user's name.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthTokens>>, AppError> {
    let tokens = auth_service::register(&state.directus, &body).await?;
    Ok(ApiResponse::success(tokens))
}
