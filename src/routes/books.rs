//! Book routes: filtered listing, genre catalogue and single-book CRUD.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::{CurrentUser, MaybeToken};
use crate::models::book::{Book, CreateBook, UpdateBook};
use crate::models::pagination::PageQuery;
use crate::services::book_crud;
use crate::services::book_list::{BookListController, BookPage};
use crate::services::filters::FilterUpdate;
use crate::services::genres;
use crate::AppState;

/// GET /api/v1/books — list books with filters and pagination.
pub async fn list(
    State(state): State<AppState>,
    token: MaybeToken,
    Query(page): Query<PageQuery>,
    Query(filters): Query<FilterUpdate>,
) -> Json<ApiResponse<BookPage>> {
    let controller = BookListController::new(
        state.gateway(token.as_deref()),
        state.assets.clone(),
        state.config.books_page_size,
    )
    .with_filters(filters);
    controller.open_page(page.current_page()).await;
    ApiResponse::success(controller.snapshot().await.into())
}

/// GET /api/v1/genres — every genre in use, sorted.
pub async fn genres(
    State(state): State<AppState>,
    token: MaybeToken,
) -> Json<ApiResponse<Vec<String>>> {
    let gateway = state.gateway(token.as_deref());
    ApiResponse::success(genres::fetch_genres(gateway.as_ref()).await)
}

/// POST /api/v1/books — create a book owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateBook>,
) -> Result<Json<ApiResponse<Book>>, AppError> {
    let book = book_crud::create(&current_user.directus, &state.assets, &body).await?;
    Ok(ApiResponse::success(book))
}

/// GET /api/v1/books/{id} — get book by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    token: MaybeToken,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Book>>, AppError> {
    let gateway = state.gateway(token.as_deref());
    let book = book_crud::get_by_id(gateway.as_ref(), &state.assets, &id).await?;
    Ok(ApiResponse::success(book))
}

/// PATCH /api/v1/books/{id} — update a book (owner or admin).
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateBook>,
) -> Result<Json<ApiResponse<Book>>, AppError> {
    let existing = book_crud::get_by_id(&current_user.directus, &state.assets, &id).await?;
    book_crud::ensure_can_edit(&existing, &current_user.user, state.config.admin_role_id())?;
    let book = book_crud::update(&current_user.directus, &state.assets, &id, &body).await?;
    Ok(ApiResponse::success(book))
}

/// DELETE /api/v1/books/{id} — delete a book (owner or admin).
pub async fn delete(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let existing = book_crud::get_by_id(&current_user.directus, &state.assets, &id).await?;
    book_crud::ensure_can_edit(&existing, &current_user.user, state.config.admin_role_id())?;
    book_crud::remove(&current_user.directus, &id).await?;
    Ok(ApiResponse::success(()))
}
