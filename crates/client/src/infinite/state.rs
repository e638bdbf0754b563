//! Loader state as seen from the outside.

use std::fmt;

use ruiqi_shared::ApiError;
use serde::Serialize;

/// Identity of a collection's filter and sort parameters.
///
/// Two equal keys address the same collection; any change starts a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }

    /// Extend the key with serialized parameters.
    pub fn with<P: Serialize + ?Sized>(self, params: &P) -> Self {
        let part = serde_json::to_string(params)
            .unwrap_or_else(|e| format!("<unserializable: {e}>"));
        Self(format!("{}:{part}", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// No request in flight.
    #[default]
    Idle,
    FetchingFirst,
    FetchingNext,
    /// Last request failed; waits for `refetch()`.
    Error,
}

impl LoadPhase {
    pub fn is_fetching(&self) -> bool {
        matches!(self, LoadPhase::FetchingFirst | LoadPhase::FetchingNext)
    }
}

/// Everything a list view renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderSnapshot<T> {
    pub query_key: QueryKey,
    pub items: Vec<T>,
    pub phase: LoadPhase,
    /// First page is loading.
    pub is_loading: bool,
    pub is_fetching_next_page: bool,
    pub has_more: bool,
    /// At least one page has been received for the current key.
    pub is_settled: bool,
    pub error: Option<ApiError>,
    /// Cursor of the next page to request.
    pub cursor: u32,
    /// Server total from the latest page.
    pub total: u64,
}

impl<T> LoaderSnapshot<T> {
    /// Safe to render "no more data".
    pub fn is_exhausted(&self) -> bool {
        self.is_settled && !self.has_more
    }

    pub fn is_empty(&self) -> bool {
        self.is_settled && self.items.is_empty()
    }
}

/// Why a `fetch_next_page` call issued no request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    InFlight,
    /// The previous request failed; only `refetch()` retries it.
    AwaitingRefetch,
    Exhausted,
    /// The last page came back empty although the total promised more.
    Stalled,
    TornDown,
}

/// Result of one `fetch_next_page` / `refetch` call.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Appended {
        cursor: u32,
        received: usize,
        has_more: bool,
    },
    Failed(ApiError),
    Dropped(DropReason),
    /// The response belonged to a superseded query key and was discarded.
    Stale,
}

impl FetchOutcome {
    pub fn is_appended(&self) -> bool {
        matches!(self, FetchOutcome::Appended { .. })
    }
}
