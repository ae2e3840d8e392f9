//! Session hydration against the identity provider.

use serde::Serialize;

use crate::errors::AppError;
use crate::gateway::{DirectusGateway, GatewayError, GatewayResult};
use crate::models::user::{SessionProfile, SessionUser};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStatus {
    #[default]
    Loading,
    Authenticated,
    Guest,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub status: AuthStatus,
}

impl SessionState {
    /// Any failure to resolve the user degrades to a guest session.
    pub fn from_lookup(lookup: GatewayResult<SessionUser>) -> Self {
        match lookup {
            Ok(user) => Self {
                user: Some(user),
                status: AuthStatus::Authenticated,
            },
            Err(e) => {
                tracing::debug!(error = %e, "No session, continuing as guest");
                Self::guest()
            }
        }
    }

    pub fn guest() -> Self {
        Self {
            user: None,
            status: AuthStatus::Guest,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn profile(&self, admin_role_id: Option<&str>) -> Option<SessionProfile> {
        self.user
            .clone()
            .map(|user| SessionProfile::new(user, admin_role_id))
    }
}

/// Resolve the user behind `directus`'s token; without a token the session is a guest.
pub async fn hydrate(directus: &DirectusGateway) -> SessionState {
    if directus.token().is_none() {
        return SessionState::guest();
    }
    SessionState::from_lookup(directus.current_user().await)
}

/// The user a write is made on behalf of. Missing or rejected credentials are
/// `Unauthorized`; any other lookup failure is reported as the store's error.
pub async fn authenticate(directus: &DirectusGateway) -> Result<SessionUser, AppError> {
    if directus.token().is_none() {
        return Err(AppError::Unauthorized);
    }
    directus.current_user().await.map_err(rejection)
}

fn rejection(e: GatewayError) -> AppError {
    match e.status() {
        Some(401 | 403) => AppError::Unauthorized,
        _ => {
            tracing::error!(error = %e, "Session lookup failed");
            AppError::Gateway(e)
        }
    }
}
