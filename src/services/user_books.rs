//! Owner-scoped book listing.
//!
//! One owner's complete set is fetched in a single unpaged request and sliced
//! locally. Every page turn re-fetches the set so the view never lags behind
//! edits made elsewhere; owner sets are small enough for that to be cheap.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::gateway::{CollectionGateway, ItemQuery, Predicate, SortKey};
use crate::models::book::{Book, BOOKS_COLLECTION};
use crate::models::pagination::{compute_pagination, slice_page, PagedResult, PaginationState};
use crate::services::assets::AssetUrls;

pub const DEFAULT_PAGE_SIZE: u64 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct UserBooksView {
    pub items: Vec<Book>,
    pub pagination: PaginationState,
    pub loading: bool,
    pub paginating: bool,
    pub expanded: bool,
    pub last_error: Option<String>,
}

/// One page of an owner's books as served over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct UserBooksPage {
    #[serde(flatten)]
    pub result: PagedResult<Book>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<UserBooksView> for UserBooksPage {
    fn from(view: UserBooksView) -> Self {
        Self {
            result: PagedResult::new(view.items, &view.pagination),
            error: view.last_error,
        }
    }
}

#[derive(Debug)]
struct UserBooksState {
    visible: Vec<Book>,
    pagination: PaginationState,
    loading: bool,
    paginating: bool,
    expanded: bool,
    last_error: Option<String>,
    generation: u64,
}

pub struct UserBookController {
    gateway: Arc<dyn CollectionGateway>,
    assets: AssetUrls,
    state: Mutex<UserBooksState>,
}

impl UserBookController {
    pub fn new(gateway: Arc<dyn CollectionGateway>, assets: AssetUrls, limit: u64) -> Self {
        Self {
            gateway,
            assets,
            state: Mutex::new(UserBooksState {
                visible: Vec::new(),
                pagination: PaginationState::new(limit),
                loading: false,
                paginating: false,
                expanded: false,
                last_error: None,
                generation: 0,
            }),
        }
    }

    async fn query_owner(&self, owner_id: &str) -> Result<Vec<Book>, String> {
        let query = ItemQuery::new()
            .filter(Predicate::eq("user_created", owner_id))
            .sort(SortKey::desc("date_created"))
            .unlimited();
        match self.gateway.query(BOOKS_COLLECTION, &query).await {
            Ok(Some(page)) => page
                .decode::<Book>()
                .map(|books| self.assets.decorate_all(books))
                .map_err(|e| e.to_string()),
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Every book created by `owner_id`, newest first. Never fails; an empty
    /// owner id short-circuits without a request. The books are returned even
    /// when a newer call has started, but only the newest call updates state.
    pub async fn fetch_all(&self, owner_id: &str) -> Vec<Book> {
        if owner_id.is_empty() {
            return Vec::new();
        }

        let generation = self.begin(false).await;
        let result = self.query_owner(owner_id).await;
        let mut state = self.state.lock().await;
        let current = state.generation == generation;
        if current {
            state.loading = false;
        }

        match result {
            Ok(books) => {
                tracing::debug!(owner_id, count = books.len(), "Fetched owner books");
                books
            }
            Err(reason) => {
                tracing::error!(owner_id, error = %reason, "Failed to fetch owner books");
                if current {
                    state.last_error = Some(reason);
                }
                Vec::new()
            }
        }
    }

    async fn begin(&self, paginating: bool) -> u64 {
        let mut state = self.state.lock().await;
        state.generation += 1;
        if paginating {
            state.paginating = true;
        } else {
            state.loading = true;
        }
        state.generation
    }

    /// Fetch the owner's set and show the current page of it.
    pub async fn load_page(&self, owner_id: &str) {
        if owner_id.is_empty() {
            return;
        }

        let generation = self.begin(false).await;
        let result = self.query_owner(owner_id).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(owner_id, generation, "Discarding stale owner books");
            return;
        }
        state.loading = false;

        match result {
            Ok(all) => {
                let limit = state.pagination.limit;
                state
                    .pagination
                    .apply_counts(compute_pagination(all.len() as u64, limit));
                state.visible = slice_page(&all, state.pagination.page, limit).to_vec();
                state.last_error = None;
            }
            Err(reason) => {
                tracing::error!(owner_id, error = %reason, "Failed to load owner books");
                state.visible.clear();
                state.pagination.reset();
                state.last_error = Some(reason);
            }
        }
    }

    /// Show page `page` of the owner's freshly fetched set. Falls back to page 1
    /// when the fetch fails.
    pub async fn set_page(&self, page: u64, owner_id: &str) {
        if owner_id.is_empty() || page < 1 {
            return;
        }

        let generation = self.begin(true).await;
        let result = self.query_owner(owner_id).await;

        {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                tracing::debug!(owner_id, generation, "Discarding stale owner page");
                return;
            }
            state.paginating = false;

            match result {
                Ok(all) => {
                    let limit = state.pagination.limit;
                    state
                        .pagination
                        .apply_counts(compute_pagination(all.len() as u64, limit));
                    state.pagination.page = page;
                    state.visible = slice_page(&all, page, limit).to_vec();
                    state.last_error = None;
                    return;
                }
                Err(reason) => {
                    tracing::warn!(owner_id, page, error = %reason, "Page change failed, reloading page 1");
                    state.pagination.page = 1;
                    state.last_error = Some(reason);
                }
            }
        }

        self.load_page(owner_id).await;
    }

    pub async fn toggle_expanded(&self) -> bool {
        let mut state = self.state.lock().await;
        state.expanded = !state.expanded;
        state.expanded
    }

    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.visible.clear();
        state.pagination.reset();
        state.expanded = false;
        state.last_error = None;
    }

    pub async fn snapshot(&self) -> UserBooksView {
        let state = self.state.lock().await;
        UserBooksView {
            items: state.visible.clone(),
            pagination: state.pagination,
            loading: state.loading,
            paginating: state.paginating,
            expanded: state.expanded,
            last_error: state.last_error.clone(),
        }
    }
}
