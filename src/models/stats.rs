//! Registry statistics shown on the admin dashboard.

use serde::Serialize;

use super::user::UserSummary;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminStats {
    pub total_books: u64,
    pub total_users: u64,
}

/// Statistics plus the user directory they were computed from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistryData {
    pub stats: AdminStats,
    pub users: Vec<UserSummary>,
}
