//! Global book listing: server-side paging over the filtered `books` collection.
//!
//! Reads never fail towards the caller. A transport error, a missing result
//! envelope or an undecodable item empties the listing, resets paging and is
//! recorded in `last_error`. Every fetch is stamped with a generation and only
//! the most recently issued fetch may update the state.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::gateway::{CollectionGateway, ItemQuery};
use crate::models::book::{Book, BOOKS_COLLECTION};
use crate::models::pagination::{compute_pagination, PagedResult, PaginationState};
use crate::services::assets::AssetUrls;
use crate::services::filters::{FilterBuilder, FilterState, FilterUpdate};

pub const DEFAULT_PAGE_SIZE: u64 = 6;

/// Immutable view of the listing handed to callers.
#[derive(Debug, Clone, Serialize)]
pub struct BookListView {
    pub items: Vec<Book>,
    pub pagination: PaginationState,
    pub filters: FilterState,
    pub loading: bool,
    pub last_error: Option<String>,
}

/// Listing page as served over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct BookPage {
    #[serde(flatten)]
    pub result: PagedResult<Book>,
    pub filters: FilterState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<BookListView> for BookPage {
    fn from(view: BookListView) -> Self {
        Self {
            result: PagedResult::new(view.items, &view.pagination),
            filters: view.filters,
            error: view.last_error,
        }
    }
}

#[derive(Debug)]
struct ListState {
    filters: FilterBuilder,
    pagination: PaginationState,
    items: Vec<Book>,
    loading: bool,
    last_error: Option<String>,
    generation: u64,
}

impl ListState {
    fn fail(&mut self, reason: String) {
        tracing::error!(error = %reason, "Failed to fetch books");
        self.items.clear();
        self.pagination.reset();
        self.last_error = Some(reason);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchOutcome {
    Applied,
    Failed,
    /// The page no longer exists; paging was moved back to page 1.
    PageCorrected,
    /// A newer fetch was issued while this one was in flight.
    Stale,
}

pub struct BookListController {
    gateway: Arc<dyn CollectionGateway>,
    assets: AssetUrls,
    state: Mutex<ListState>,
}

impl BookListController {
    pub fn new(gateway: Arc<dyn CollectionGateway>, assets: AssetUrls, limit: u64) -> Self {
        Self {
            gateway,
            assets,
            state: Mutex::new(ListState {
                filters: FilterBuilder::new(),
                pagination: PaginationState::new(limit),
                items: Vec::new(),
                loading: false,
                last_error: None,
                generation: 0,
            }),
        }
    }

    /// Seed the criteria of a controller that has not fetched yet.
    pub fn with_filters(mut self, update: FilterUpdate) -> Self {
        self.state.get_mut().filters.merge(update);
        self
    }

    /// Fetch the current page. Corrects an out-of-range page at most once.
    pub async fn fetch(&self) {
        if self.fetch_once().await == FetchOutcome::PageCorrected {
            // Page 1 always fits a non-empty result, so a second correction cannot occur.
            self.fetch_once().await;
        }
    }

    async fn fetch_once(&self) -> FetchOutcome {
        let (generation, query) = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.loading = true;
            let compiled = state.filters.compile();
            let query = ItemQuery::new()
                .filter(compiled.predicate)
                .sort(compiled.sort)
                .page(state.pagination.page, state.pagination.limit)
                .with_total_count();
            (state.generation, query)
        };

        let result = self.gateway.query(BOOKS_COLLECTION, &query).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(generation, latest = state.generation, "Discarding stale book page");
            return FetchOutcome::Stale;
        }
        state.loading = false;

        let page = match result {
            Ok(Some(page)) => page,
            Ok(None) => {
                state.fail("Collection store returned no result envelope".to_string());
                return FetchOutcome::Failed;
            }
            Err(e) => {
                state.fail(e.to_string());
                return FetchOutcome::Failed;
            }
        };

        let total = page.total_count.unwrap_or(0);
        let books = match page.decode::<Book>() {
            Ok(books) => books,
            Err(e) => {
                state.fail(e.to_string());
                return FetchOutcome::Failed;
            }
        };

        let limit = state.pagination.limit;
        state.pagination.apply_counts(compute_pagination(total, limit));

        if state.pagination.is_out_of_range() {
            tracing::info!(
                page = state.pagination.page,
                total_pages = state.pagination.total_pages,
                "Requested page no longer exists, returning to page 1"
            );
            state.pagination.page = 1;
            state.loading = true;
            return FetchOutcome::PageCorrected;
        }

        state.items = self.assets.decorate_all(books);
        state.last_error = None;
        tracing::debug!(
            page = state.pagination.page,
            total,
            items = state.items.len(),
            "Fetched book page"
        );
        FetchOutcome::Applied
    }

    /// Move to page `n` and fetch it. Pages outside `1..=total_pages` are ignored.
    pub async fn set_page(&self, page: u64) {
        {
            let mut state = self.state.lock().await;
            if !state.pagination.accepts_page(page) {
                tracing::debug!(page, total_pages = state.pagination.total_pages, "Ignoring invalid page");
                return;
            }
            state.pagination.page = page;
        }
        self.fetch().await;
    }

    /// Position on `page` before any totals are known and fetch it.
    ///
    /// Used when a caller arrives with a page number (e.g. from a link); a page
    /// past the end is corrected by [`Self::fetch`].
    pub async fn open_page(&self, page: u64) {
        {
            let mut state = self.state.lock().await;
            state.pagination.page = page.max(1);
        }
        self.fetch().await;
    }

    /// Merge new criteria, go back to the first page and fetch.
    pub async fn set_filters(&self, update: FilterUpdate) {
        {
            let mut state = self.state.lock().await;
            state.filters.merge(update);
            state.pagination.page = 1;
        }
        self.fetch().await;
    }

    /// Restore default criteria without fetching.
    pub async fn reset_filters(&self) {
        self.state.lock().await.filters.reset();
    }

    /// Restore default criteria and paging, then fetch.
    pub async fn reset_all(&self) {
        {
            let mut state = self.state.lock().await;
            state.filters.reset();
            state.pagination.reset();
        }
        self.fetch().await;
    }

    pub async fn snapshot(&self) -> BookListView {
        let state = self.state.lock().await;
        BookListView {
            items: state.items.clone(),
            pagination: state.pagination,
            filters: state.filters.state().clone(),
            loading: state.loading,
            last_error: state.last_error.clone(),
        }
    }
}
