//! Pagination primitives shared by the global and owner-scoped book listings.

use serde::{Deserialize, Serialize};

/// Page count metadata derived from a total item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageCounts {
    pub total: u64,
    pub total_pages: u64,
}

/// Compute `{total, total_pages}` for `total_items` split into pages of `limit`.
///
/// A zero total yields zero pages, which is the valid "empty result" state.
pub fn compute_pagination(total_items: u64, limit: u64) -> PageCounts {
    let limit = limit.max(1);
    PageCounts {
        total: total_items,
        total_pages: total_items.div_ceil(limit),
    }
}

/// Return the half-open slice `[(page-1)*limit, page*limit)` of `items`.
///
/// Pages past the end (and page 0) yield an empty slice.
pub fn slice_page<T>(items: &[T], page: u64, limit: u64) -> &[T] {
    if page == 0 || limit == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(limit);
    let Ok(start) = usize::try_from(start) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start
        .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
        .min(items.len());
    &items[start..end]
}

/// Paging state owned by a listing controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationState {
    /// Fresh state on page 1. The limit is fixed for the lifetime of the owner.
    pub fn new(limit: u64) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
            total_pages: 0,
        }
    }

    /// Back to page 1 with no known items; `limit` is preserved.
    pub fn reset(&mut self) {
        self.page = 1;
        self.total = 0;
        self.total_pages = 0;
    }

    pub fn apply_counts(&mut self, counts: PageCounts) {
        self.total = counts.total;
        self.total_pages = counts.total_pages;
    }

    /// Whether the current page points past the last page of a non-empty result.
    pub fn is_out_of_range(&self) -> bool {
        self.total_pages > 0 && self.page > self.total_pages
    }

    /// Whether `page` may be selected by a caller.
    pub fn accepts_page(&self, page: u64) -> bool {
        page >= 1 && page <= self.total_pages
    }
}

/// Page query parameter accepted by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    pub fn current_page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Paged result envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T: Serialize> PagedResult<T> {
    pub fn new(items: Vec<T>, state: &PaginationState) -> Self {
        Self {
            items,
            total: state.total,
            page: state.page,
            per_page: state.limit,
            total_pages: state.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_items_means_zero_pages() {
        for limit in [1, 3, 6, 100] {
            assert_eq!(
                compute_pagination(0, limit),
                PageCounts {
                    total: 0,
                    total_pages: 0
                }
            );
        }
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(compute_pagination(10, 6).total_pages, 2);
        assert_eq!(compute_pagination(10, 6).total, 10);
        assert_eq!(compute_pagination(12, 6).total_pages, 2);
        assert_eq!(compute_pagination(13, 6).total_pages, 3);
    }

    #[test]
    fn slice_returns_requested_page() {
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(slice_page(&items, 2, 4), &[5, 6, 7, 8]);
        assert_eq!(slice_page(&items, 3, 4), &[9, 10]);
    }

    #[test]
    fn slice_out_of_range_is_empty() {
        let items: Vec<u32> = (1..=10).collect();
        assert!(slice_page(&items, 5, 4).is_empty());
        assert!(slice_page(&items, 0, 4).is_empty());
        assert!(slice_page::<u32>(&[], 1, 4).is_empty());
    }

    #[test]
    fn reset_preserves_limit() {
        let mut state = PaginationState::new(6);
        state.page = 4;
        state.apply_counts(compute_pagination(30, 6));
        state.reset();
        assert_eq!(state, PaginationState::new(6));
        assert_eq!(state.limit, 6);
    }

    #[test]
    fn out_of_range_only_when_pages_exist() {
        let mut state = PaginationState::new(6);
        state.page = 5;
        assert!(!state.is_out_of_range());

        state.apply_counts(compute_pagination(25, 6));
        assert!(!state.is_out_of_range());

        state.apply_counts(compute_pagination(10, 6));
        assert!(state.is_out_of_range());
    }

    #[test]
    fn accepts_page_bounds() {
        let mut state = PaginationState::new(6);
        state.apply_counts(compute_pagination(13, 6));
        assert!(!state.accepts_page(0));
        assert!(state.accepts_page(1));
        assert!(state.accepts_page(3));
        assert!(!state.accepts_page(4));
    }

    #[test]
    fn paged_result_mirrors_state() {
        let mut state = PaginationState::new(10);
        state.apply_counts(compute_pagination(25, 10));
        let result = PagedResult::new(vec![1, 2, 3], &state);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.total, 25);
        assert_eq!(result.page, 1);
        assert_eq!(result.per_page, 10);
    }

    #[test]
    fn page_query_defaults_to_first_page() {
        assert_eq!(PageQuery { page: None }.current_page(), 1);
        assert_eq!(PageQuery { page: Some(0) }.current_page(), 1);
        assert_eq!(PageQuery { page: Some(4) }.current_page(), 4);
    }
}
