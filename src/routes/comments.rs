//! Comment thread routes for a single book.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::{CurrentUser, MaybeToken};
use crate::models::comment::CreateComment;
use crate::services::comments::{CommentGate, CommentsView};
use crate::AppState;

/// GET /api/v1/books/{id}/comments — comments plus whether new ones are accepted.
pub async fn list(
    State(state): State<AppState>,
    token: MaybeToken,
    Path(book_id): Path<String>,
) -> Json<ApiResponse<CommentsView>> {
    let gate = CommentGate::new(state.gateway(token.as_deref()), book_id);
    gate.fetch_comments().await;
    ApiResponse::success(gate.snapshot().await)
}

/// POST /api/v1/books/{id}/comments — add a comment; refused when the book disables comments.
pub async fn create(
    current_user: CurrentUser,
    Path(book_id): Path<String>,
    Json(body): Json<CreateComment>,
) -> Result<Json<ApiResponse<CommentsView>>, AppError> {
    let gate = CommentGate::new(Arc::new(current_user.directus), book_id);
    gate.fetch_for_write().await?;
    gate.add_comment(&body).await?;
    Ok(ApiResponse::success(gate.snapshot().await))
}

/// DELETE /api/v1/books/{id}/comments/{comment_id} — delete a comment.
pub async fn delete(
    current_user: CurrentUser,
    Path((book_id, comment_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let gate = CommentGate::new(Arc::new(current_user.directus), book_id);
    gate.delete_comment(&comment_id).await?;
    Ok(ApiResponse::success(()))
}
