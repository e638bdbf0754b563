use std::rc::Rc;

use dioxus::prelude::*;
use ruiqi_shared::ApiError;

use crate::infinite::{CollectionController, LoaderSnapshot, PageFetcher, QueryKey};

/// Handle returned by [`use_infinite_list`].
///
/// Reading through the handle subscribes the calling component to loader
/// updates. The fetch methods spawn on the component's scope.
pub struct InfiniteList<T: 'static> {
    controller: CopyValue<Rc<CollectionController<T>>>,
    snapshot: Signal<LoaderSnapshot<T>>,
}

impl<T: 'static> Clone for InfiniteList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for InfiniteList<T> {}

impl<T: Clone + 'static> InfiniteList<T> {
    pub fn snapshot(&self) -> LoaderSnapshot<T> {
        self.snapshot.cloned()
    }

    pub fn items(&self) -> Vec<T> {
        self.snapshot.read().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.read().is_loading
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.snapshot.read().is_fetching_next_page
    }

    pub fn has_more(&self) -> bool {
        self.snapshot.read().has_more
    }

    pub fn error(&self) -> Option<ApiError> {
        self.snapshot.read().error.clone()
    }

    pub fn fetch_next_page(&self) {
        let controller = self.controller();
        spawn(async move {
            controller.fetch_next_page().await;
        });
    }

    pub fn refetch(&self) {
        let controller = self.controller();
        spawn(async move {
            controller.refetch().await;
        });
    }

    /// Clear the list and load it again from the first page. Ignored while a
    /// page is loading.
    pub fn reset(&self) {
        let controller = self.controller();
        if !controller.reset() {
            return;
        }
        spawn(async move {
            controller.fetch_next_page().await;
        });
    }

    pub fn controller(&self) -> Rc<CollectionController<T>> {
        self.controller.cloned()
    }
}

/// Incrementally loaded collection bound to the calling component.
///
/// `query_key` is tracked like a memo: when a signal it reads changes and the
/// key differs, the list resets and loads its first page again. The fetcher
/// is built once; it should read any filter state at fetch time.
///
/// ```rust,ignore
/// let list = use_infinite_list(
///     move || QueryKey::new("attack-events").with(&*filter.read()),
///     ctx.page_size(),
///     move || fetch_fn(move |page, size| {
///         let client = ctx.client();
///         let filter = filter.peek().clone();
///         async move { client.list_attack_events(&filter, page, size).await }
///     }),
/// );
/// ```
pub fn use_infinite_list<T, F>(
    query_key: impl FnMut() -> QueryKey + 'static,
    page_size: u32,
    make_fetcher: impl FnOnce() -> F,
) -> InfiniteList<T>
where
    T: Clone + 'static,
    F: PageFetcher<T> + 'static,
{
    let key = use_memo(query_key);

    let controller = use_hook(|| {
        CopyValue::new(Rc::new(CollectionController::new(
            key.peek().clone(),
            page_size,
            make_fetcher(),
        )))
    });

    let snapshot = use_hook(|| {
        let controller = controller.cloned();
        let snapshot = Signal::new(controller.snapshot());
        controller.subscribe(move |latest| {
            let mut snapshot = snapshot;
            snapshot.set(latest.clone());
        });
        snapshot
    });

    use_effect(move || {
        let key = key();
        let controller = controller.cloned();
        controller.set_query_key(key);
        if controller.needs_first_page() {
            spawn(async move {
                controller.fetch_next_page().await;
            });
        }
    });

    let owned = controller.cloned();
    use_drop(move || owned.teardown());

    InfiniteList {
        controller,
        snapshot,
    }
}
