//! Session user as reported by the identity provider.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::reference_id;

/// Fields requested for the current session; the role is always expanded.
pub const SESSION_FIELDS: [&str; 6] = [
    "id",
    "email",
    "first_name",
    "last_name",
    "role.id",
    "role.name",
];

pub const USERS_COLLECTION: &str = "directus_users";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl SessionUser {
    /// "First Last", falling back to the email when both names are blank.
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        let name = format!("{first} {last}");
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }

    pub fn is_admin(&self, admin_role_id: Option<&str>) -> bool {
        match (self.role.as_ref(), admin_role_id) {
            (Some(role), Some(admin)) => !admin.is_empty() && role.id == admin,
            _ => false,
        }
    }
}

/// Current user profile returned by `GET /me`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionProfile {
    #[serde(flatten)]
    pub user: SessionUser,
    pub full_name: String,
    pub is_admin: bool,
}

impl SessionProfile {
    pub fn new(user: SessionUser, admin_role_id: Option<&str>) -> Self {
        Self {
            full_name: user.full_name(),
            is_admin: user.is_admin(admin_role_id),
            user,
        }
    }
}

/// Row of the admin user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(deserialize_with = "reference_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 3, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}
