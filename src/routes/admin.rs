//! Administrator dashboard routes.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::errors::ApiResponse;
use crate::middleware::rbac::RequireAdmin;
use crate::models::stats::RegistryData;
use crate::services::admin;
use crate::AppState;

/// GET /api/v1/admin/stats — book and user totals plus the user directory (admin only).
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(admin_user): RequireAdmin,
) -> Json<ApiResponse<RegistryData>> {
    let data = admin::load_registry_data(
        Arc::new(admin_user.directus),
        state.assets.clone(),
        state.config.books_page_size,
        true,
    )
    .await;
    ApiResponse::success(data)
}
