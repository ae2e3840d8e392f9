//! Registry statistics for administrators.

use std::sync::Arc;

use crate::gateway::{CollectionGateway, ItemQuery};
use crate::models::stats::{AdminStats, RegistryData};
use crate::models::user::{UserSummary, USERS_COLLECTION};
use crate::services::assets::AssetUrls;
use crate::services::book_list::BookListController;

const USER_FIELDS: [&str; 4] = ["id", "first_name", "last_name", "email"];

/// Count the books through an unfiltered listing and load the user directory.
///
/// Non-admins get empty data without any request. A failed directory read
/// resets everything to zero.
pub async fn load_registry_data(
    gateway: Arc<dyn CollectionGateway>,
    assets: AssetUrls,
    page_size: u64,
    is_admin: bool,
) -> RegistryData {
    if !is_admin {
        return RegistryData::default();
    }

    let listing = BookListController::new(gateway.clone(), assets, page_size);
    listing.fetch().await;
    let total_books = listing.snapshot().await.pagination.total;

    let query = ItemQuery::new().fields(USER_FIELDS).unlimited();
    let users = match gateway.query(USERS_COLLECTION, &query).await {
        Ok(Some(page)) => page.decode::<UserSummary>(),
        Ok(None) => Ok(Vec::new()),
        Err(e) => Err(e),
    };

    match users {
        Ok(users) => {
            tracing::debug!(total_books, total_users = users.len(), "Loaded registry data");
            RegistryData {
                stats: AdminStats {
                    total_books,
                    total_users: users.len() as u64,
                },
                users,
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load registry data");
            RegistryData::default()
        }
    }
}
