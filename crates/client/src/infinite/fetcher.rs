//! Page sources for the collection controller.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use ruiqi_shared::{ApiError, Page};
use serde::de::DeserializeOwned;

use crate::api_client::{ApiClient, ListResource};

/// Retrieves one page of a collection.
///
/// `cursor` is 1-based. Implementations do not retry; a timeout surfaces as
/// [`ApiError::Network`].
#[async_trait(?Send)]
pub trait PageFetcher<T> {
    async fn fetch(&self, cursor: u32, page_size: u32) -> Result<Page<T>, ApiError>;
}

/// Fetcher backed by a list endpoint of the console API.
pub struct ApiPageFetcher<T> {
    client: ApiClient,
    resource: ListResource,
    filters: Vec<(String, String)>,
    _item: PhantomData<fn() -> T>,
}

impl<T> ApiPageFetcher<T> {
    pub fn new(client: ApiClient, resource: ListResource) -> Self {
        Self {
            client,
            resource,
            filters: Vec::new(),
            _item: PhantomData,
        }
    }

    /// Query parameters sent with every page, ahead of the paging ones.
    pub fn with_filters(mut self, filters: Vec<(String, String)>) -> Self {
        self.filters = filters;
        self
    }

    pub fn resource(&self) -> ListResource {
        self.resource
    }
}

#[async_trait(?Send)]
impl<T: DeserializeOwned + 'static> PageFetcher<T> for ApiPageFetcher<T> {
    async fn fetch(&self, cursor: u32, page_size: u32) -> Result<Page<T>, ApiError> {
        self.client
            .list_page(self.resource, cursor, page_size, &self.filters)
            .await
    }
}

/// Fetcher built from a closure, see [`fetch_fn`].
pub struct FnFetcher<F> {
    f: F,
}

/// Wrap `|cursor, page_size| async { ... }` as a [`PageFetcher`].
pub fn fetch_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher { f }
}

#[async_trait(?Send)]
impl<T, F, Fut> PageFetcher<T> for FnFetcher<F>
where
    T: 'static,
    F: Fn(u32, u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>> + 'static,
{
    async fn fetch(&self, cursor: u32, page_size: u32) -> Result<Page<T>, ApiError> {
        (self.f)(cursor, page_size).await
    }
}
