//! Session profile and owner-scoped book routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::errors::ApiResponse;
use crate::middleware::auth::{CurrentUser, MaybeToken};
use crate::models::pagination::PageQuery;
use crate::models::user::SessionProfile;
use crate::services::user_books::{UserBookController, UserBooksPage};
use crate::AppState;

/// GET /api/v1/me — the authenticated user with display name and admin flag.
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Json<ApiResponse<SessionProfile>> {
    ApiResponse::success(SessionProfile::new(
        current_user.user,
        state.config.admin_role_id(),
    ))
}

/// GET /api/v1/users/{id}/books — one page of the books a user created, newest first.
pub async fn books(
    State(state): State<AppState>,
    token: MaybeToken,
    Path(owner_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Json<ApiResponse<UserBooksPage>> {
    let controller = UserBookController::new(
        state.gateway(token.as_deref()),
        state.assets.clone(),
        state.config.user_books_page_size,
    );
    match page.current_page() {
        1 => controller.load_page(&owner_id).await,
        n => controller.set_page(n, &owner_id).await,
    }
    ApiResponse::success(controller.snapshot().await.into())
}
