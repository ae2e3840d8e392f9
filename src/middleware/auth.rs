//! Bearer token extractors for Axum handlers.
//!
//! Tokens are issued by Directus; they are never decoded here, only forwarded.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::errors::AppError;
use crate::gateway::DirectusGateway;
use crate::models::user::SessionUser;
use crate::services::session;
use crate::AppState;

/// Bearer token of the request, if any.
///
/// Public reads run with the caller's token when present so the store applies
/// that user's permissions, and anonymously otherwise.
#[derive(Debug, Clone, Default)]
pub struct MaybeToken(pub Option<String>);

impl MaybeToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequestParts<AppState> for MaybeToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await;
        Ok(MaybeToken(
            header.ok().map(|TypedHeader(auth)| auth.token().to_string()),
        ))
    }
}

/// Authenticated user resolved through `GET /users/me`.
///
/// Use as an Axum extractor in handlers that require authentication:
/// ```ignore
/// async fn handler(current_user: CurrentUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: SessionUser,
    pub token: String,
    /// Client bound to the user's token.
    pub directus: DirectusGateway,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeToken(token) = MaybeToken::from_request_parts(parts, state).await?;
        let token = token.ok_or(AppError::Unauthorized)?;

        let directus = state.directus.with_token(token.as_str());
        let user = session::authenticate(&directus).await?;

        Ok(CurrentUser {
            user,
            token,
            directus,
        })
    }
}
