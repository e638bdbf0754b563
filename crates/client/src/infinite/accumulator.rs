//! Ordered page accumulation and the derived collection view.

use ruiqi_shared::{ApiError, Page};

/// Cursor of the first page of every collection.
pub const FIRST_CURSOR: u32 = 1;

/// Pages fetched so far for one collection, in fetch order.
///
/// Everything except `pages`, `cursor` and `error` is derived on demand, so
/// there is nothing to keep in sync.
#[derive(Debug, Clone)]
pub struct CollectionAccumulator<T> {
    pages: Vec<Page<T>>,
    cursor: u32,
    error: Option<ApiError>,
}

impl<T> CollectionAccumulator<T> {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            cursor: FIRST_CURSOR,
            error: None,
        }
    }

    /// Append a page after every page already held and advance the cursor.
    ///
    /// Items are neither sorted, filtered nor deduplicated.
    pub fn append_page(&mut self, page: Page<T>) {
        self.pages.push(page);
        self.cursor += 1;
        self.error = None;
    }

    pub fn reset(&mut self) {
        self.pages.clear();
        self.cursor = FIRST_CURSOR;
        self.error = None;
    }

    pub fn pages(&self) -> &[Page<T>] {
        &self.pages
    }

    /// All items in fetch order.
    pub fn items(&self) -> impl Iterator<Item = &T> + '_ {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    /// Items actually received, which is not `pages * page_size` when rows
    /// were deleted between requests.
    pub fn fetched_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Total declared by the most recent page, 0 before the first one.
    pub fn latest_total(&self) -> u64 {
        self.pages.last().map_or(0, |page| page.total)
    }

    /// `false` until the first page resolves; check [`Self::is_settled`]
    /// before treating that as "no more data".
    pub fn has_more(&self) -> bool {
        (self.fetched_count() as u64) < self.latest_total()
    }

    /// At least one page has been appended.
    pub fn is_settled(&self) -> bool {
        !self.pages.is_empty()
    }

    /// Cursor of the next page to request.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn set_error(&mut self, error: ApiError) {
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

impl<T: Clone> CollectionAccumulator<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items().cloned().collect()
    }
}

impl<T> Default for CollectionAccumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}
