//! Sign-in and sign-up against the Directus identity endpoints.

use serde_json::json;
use validator::Validate;

use crate::errors::AppError;
use crate::gateway::directus::{AuthTokens, Registration};
use crate::gateway::{CollectionGateway, DirectusGateway};
use crate::models::user::{LoginRequest, RegisterRequest, USERS_COLLECTION};

/// Exchange credentials for Directus tokens.
pub async fn login(
    directus: &DirectusGateway,
    input: &LoginRequest,
) -> Result<AuthTokens, AppError> {
    input.validate()?;
    let tokens = directus.login(&input.email, &input.password).await?;
    tracing::info!(email = %input.email, "User logged in");
    Ok(tokens)
}

/// Register a user, sign them in and store their name on the new account.
///
/// The name is written with the fresh token, so an instance whose public
/// registration ignores profile fields still ends up with them set.
pub async fn register(
    directus: &DirectusGateway,
    input: &RegisterRequest,
) -> Result<AuthTokens, AppError> {
    input.validate()?;

    directus
        .register_user(&Registration {
            email: input.email.clone(),
            password: input.password.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
        })
        .await?;
    let tokens = directus.login(&input.email, &input.password).await?;

    let session = directus.with_token(tokens.access_token.as_str());
    session
        .update(
            USERS_COLLECTION,
            "me",
            &json!({ "first_name": input.first_name, "last_name": input.last_name }),
        )
        .await?;

    tracing::info!(email = %input.email, "User registered");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn offline() -> DirectusGateway {
        DirectusGateway::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap()
    }

    #[tokio::test]
    async fn invalid_registration_never_reaches_the_store() {
        let input = RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: String::new(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
        };
        let err = register(&offline(), &input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("last_name")));
    }

    #[tokio::test]
    async fn invalid_login_never_reaches_the_store() {
        let input = LoginRequest {
            email: "ada".to_string(),
            password: "secret1".to_string(),
        };
        let err = login(&offline(), &input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
