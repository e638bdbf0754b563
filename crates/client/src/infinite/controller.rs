//! Loader state machine for one paginated collection.
//!
//! ```text
//! Idle --fetch_next_page--> FetchingFirst | FetchingNext --ok--> Idle
//!                                                       \--err--> Error
//! Error --refetch--> FetchingFirst | FetchingNext (same cursor)
//! ```
//!
//! `refetch` and `reset` never run while a page is in flight; only a key
//! change or teardown abandons an outstanding request.
//!
//! Each query key gets its own collection instance, identified by a
//! generation number and guarded by its own [`ConcurrencyGuard`]. A response
//! is applied only if its generation is still current when it settles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ruiqi_shared::{ApiError, Page};

use super::accumulator::CollectionAccumulator;
use super::fetcher::PageFetcher;
use super::guard::ConcurrencyGuard;
use super::state::{DropReason, FetchOutcome, LoadPhase, LoaderSnapshot, QueryKey};
use crate::{log_debug, log_info, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Rc<dyn Fn(&LoaderSnapshot<T>)>;

struct Inner<T> {
    key: QueryKey,
    generation: u64,
    accumulator: CollectionAccumulator<T>,
    guard: ConcurrencyGuard,
    phase: LoadPhase,
    /// An empty page arrived while the total still promised more rows.
    stalled: bool,
    torn_down: bool,
}

impl<T> Inner<T> {
    fn start_collection(&mut self) {
        self.generation += 1;
        self.guard = ConcurrencyGuard::new();
        self.accumulator.reset();
        self.phase = LoadPhase::Idle;
        self.stalled = false;
    }

    fn drop_reason(&self) -> Option<DropReason> {
        if self.torn_down {
            Some(DropReason::TornDown)
        } else if self.guard.is_fetching() {
            Some(DropReason::InFlight)
        } else if self.phase == LoadPhase::Error {
            Some(DropReason::AwaitingRefetch)
        } else if self.accumulator.is_settled() && !self.accumulator.has_more() {
            Some(DropReason::Exhausted)
        } else if self.stalled {
            Some(DropReason::Stalled)
        } else {
            None
        }
    }
}

/// Owns the pages of one collection and decides when a page may be fetched.
///
/// Single-threaded: share it behind an `Rc` and drive its futures on the UI
/// executor.
pub struct CollectionController<T> {
    inner: RefCell<Inner<T>>,
    fetcher: Rc<dyn PageFetcher<T>>,
    page_size: u32,
    listeners: RefCell<Vec<(ListenerId, Listener<T>)>>,
    next_listener: Cell<u64>,
}

impl<T: Clone + 'static> CollectionController<T> {
    pub fn new(key: QueryKey, page_size: u32, fetcher: impl PageFetcher<T> + 'static) -> Self {
        Self::from_shared(key, page_size, Rc::new(fetcher))
    }

    pub fn from_shared(key: QueryKey, page_size: u32, fetcher: Rc<dyn PageFetcher<T>>) -> Self {
        Self {
            inner: RefCell::new(Inner {
                key,
                generation: 0,
                accumulator: CollectionAccumulator::new(),
                guard: ConcurrencyGuard::new(),
                phase: LoadPhase::Idle,
                stalled: false,
                torn_down: false,
            }),
            fetcher,
            page_size: page_size.max(1),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    pub fn query_key(&self) -> QueryKey {
        self.inner.borrow().key.clone()
    }

    pub fn phase(&self) -> LoadPhase {
        self.inner.borrow().phase
    }

    pub fn cursor(&self) -> u32 {
        self.inner.borrow().accumulator.cursor()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn is_fetching(&self) -> bool {
        self.inner.borrow().guard.is_fetching()
    }

    /// No page has been requested for the current key yet.
    pub fn needs_first_page(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.torn_down
            && !inner.accumulator.is_settled()
            && inner.phase == LoadPhase::Idle
            && !inner.guard.is_fetching()
    }

    /// Switch to another query key.
    ///
    /// Returns `true` when the key differed, in which case the collection was
    /// reset and the caller should request the first page.
    pub fn set_query_key(&self, key: QueryKey) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down || inner.key == key {
                return false;
            }
            log_info!("Query key changed: {} -> {}", inner.key, key);
            inner.key = key;
            inner.start_collection();
        }
        self.notify();
        true
    }

    /// Drop every page and start over under the same key.
    ///
    /// Refused while a page is in flight; returns whether the collection was
    /// reset.
    pub fn reset(&self) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down || inner.guard.is_fetching() {
                return false;
            }
            log_debug!("Resetting collection {}", inner.key);
            inner.start_collection();
        }
        self.notify();
        true
    }

    /// Request the page at the current cursor.
    ///
    /// Dropped without a request while another fetch is in flight, after a
    /// failure (see [`Self::refetch`]) and once the collection is exhausted.
    pub async fn fetch_next_page(&self) -> FetchOutcome {
        if let Some(reason) = self.inner.borrow().drop_reason() {
            log_debug!("fetch_next_page dropped: {:?}", reason);
            return FetchOutcome::Dropped(reason);
        }
        self.issue().await
    }

    /// Retry the failed page, or reload from the first page when nothing
    /// failed. Dropped while another fetch is in flight.
    pub async fn refetch(&self) -> FetchOutcome {
        let retry = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return FetchOutcome::Dropped(DropReason::TornDown);
            }
            if inner.guard.is_fetching() {
                log_debug!("refetch dropped: page {} in flight", inner.accumulator.cursor());
                return FetchOutcome::Dropped(DropReason::InFlight);
            }
            if inner.phase == LoadPhase::Error {
                inner.accumulator.clear_error();
                inner.phase = LoadPhase::Idle;
                inner.stalled = false;
                true
            } else {
                false
            }
        };

        if retry {
            log_info!("Retrying page {}", self.cursor());
        } else {
            self.reset();
        }
        self.issue().await
    }

    /// Stop the collection for good. Responses still in flight are
    /// discarded and listeners are released.
    pub fn teardown(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return;
            }
            inner.torn_down = true;
            inner.generation += 1;
            inner.guard = ConcurrencyGuard::new();
            inner.phase = LoadPhase::Idle;
        }
        self.listeners.borrow_mut().clear();
    }

    pub fn subscribe(&self, listener: impl Fn(&LoaderSnapshot<T>) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(other, _)| *other != id);
    }

    pub fn snapshot(&self) -> LoaderSnapshot<T> {
        let inner = self.inner.borrow();
        let acc = &inner.accumulator;
        LoaderSnapshot {
            query_key: inner.key.clone(),
            items: acc.to_vec(),
            phase: inner.phase,
            is_loading: inner.phase == LoadPhase::FetchingFirst,
            is_fetching_next_page: inner.phase == LoadPhase::FetchingNext,
            has_more: acc.has_more(),
            is_settled: acc.is_settled(),
            error: acc.error().cloned(),
            cursor: acc.cursor(),
            total: acc.latest_total(),
        }
    }

    async fn issue(&self) -> FetchOutcome {
        let (guard, generation, cursor) = {
            let inner = self.inner.borrow();
            (
                inner.guard.clone(),
                inner.generation,
                inner.accumulator.cursor(),
            )
        };

        let settled = guard
            .request_next(|| {
                self.begin(cursor);
                self.fetcher.fetch(cursor, self.page_size)
            })
            .await;

        match settled {
            Some(result) => self.settle(generation, cursor, result),
            None => FetchOutcome::Dropped(DropReason::InFlight),
        }
    }

    fn begin(&self, cursor: u32) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.phase = if inner.accumulator.is_settled() {
                LoadPhase::FetchingNext
            } else {
                LoadPhase::FetchingFirst
            };
            log_debug!(
                "Fetching {} page {} (size {})",
                inner.key,
                cursor,
                self.page_size
            );
        }
        self.notify();
    }

    fn settle(&self, generation: u64, cursor: u32, result: Result<Page<T>, ApiError>) -> FetchOutcome {
        let outcome = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down || inner.generation != generation {
                log_debug!(
                    "Discarding stale page {} (generation {}, current {})",
                    cursor,
                    generation,
                    inner.generation
                );
                return FetchOutcome::Stale;
            }

            match result {
                Ok(page) => {
                    let received = page.len();
                    inner.accumulator.append_page(page);
                    inner.phase = LoadPhase::Idle;
                    let has_more = inner.accumulator.has_more();
                    if received == 0 && has_more {
                        inner.stalled = true;
                        log_warn!(
                            "Page {} of {} was empty but total is {}; pausing automatic loading",
                            cursor,
                            inner.key,
                            inner.accumulator.latest_total()
                        );
                    }
                    log_debug!(
                        "Page {} of {}: {} items, {}/{} loaded",
                        cursor,
                        inner.key,
                        received,
                        inner.accumulator.fetched_count(),
                        inner.accumulator.latest_total()
                    );
                    FetchOutcome::Appended {
                        cursor,
                        received,
                        has_more,
                    }
                }
                Err(e) => {
                    log_warn!("Page {} of {} failed: {}", cursor, inner.key, e);
                    inner.accumulator.set_error(e.clone());
                    inner.phase = LoadPhase::Error;
                    FetchOutcome::Failed(e)
                }
            }
        };
        self.notify();
        outcome
    }

    fn notify(&self) {
        let listeners: Vec<Listener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infinite::fetch_fn;
    use futures_util::future::{join, ready};

    fn numbers(cursor: u32, size: u32, total: u64) -> Page<u64> {
        let start = u64::from(cursor - 1) * u64::from(size);
        let end = (start + u64::from(size)).min(total);
        Page::new((start..end).collect(), total)
    }

    fn counting(total: u64) -> (Rc<RefCell<Vec<u32>>>, CollectionController<u64>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&calls);
        let controller = CollectionController::new(
            QueryKey::new("numbers"),
            20,
            fetch_fn(move |cursor, size| {
                log.borrow_mut().push(cursor);
                ready(Ok(numbers(cursor, size, total)))
            }),
        );
        (calls, controller)
    }

    #[tokio::test]
    async fn loads_until_total_is_reached() {
        let (calls, controller) = counting(45);
        assert!(controller.needs_first_page());

        for expected in [true, true, false] {
            match controller.fetch_next_page().await {
                FetchOutcome::Appended { has_more, .. } => assert_eq!(has_more, expected),
                other => panic!("unexpected outcome {other:?}"),
            }
        }

        assert_eq!(
            controller.fetch_next_page().await,
            FetchOutcome::Dropped(DropReason::Exhausted)
        );
        assert_eq!(*calls.borrow(), vec![1, 2, 3]);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.items, (0..45).collect::<Vec<_>>());
        assert!(snapshot.is_exhausted());
        assert_eq!(snapshot.cursor, 4);
    }

    #[tokio::test]
    async fn empty_collection_settles_without_more() {
        let (_, controller) = counting(0);
        assert!(controller.fetch_next_page().await.is_appended());
        let snapshot = controller.snapshot();
        assert!(snapshot.is_empty());
        assert!(!snapshot.has_more);
        assert!(!controller.needs_first_page());
    }

    #[tokio::test]
    async fn page_size_is_at_least_one() {
        let controller = CollectionController::new(
            QueryKey::new("numbers"),
            0,
            fetch_fn(|cursor, size| ready(Ok(numbers(cursor, size, 3)))),
        );
        assert_eq!(controller.page_size(), 1);
        controller.fetch_next_page().await;
        assert_eq!(controller.snapshot().items, vec![0]);
    }

    #[tokio::test]
    async fn failure_waits_for_refetch_of_the_same_cursor() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&calls);
        let controller = CollectionController::new(
            QueryKey::new("flaky"),
            20,
            fetch_fn(move |cursor, size| {
                log.borrow_mut().push(cursor);
                let attempt = log.borrow().len();
                ready(if attempt == 2 {
                    Err(ApiError::Network("connection reset".into()))
                } else {
                    Ok(numbers(cursor, size, 45))
                })
            }),
        );

        controller.fetch_next_page().await;
        assert!(matches!(
            controller.fetch_next_page().await,
            FetchOutcome::Failed(ApiError::Network(_))
        ));
        let failed = controller.snapshot();
        assert_eq!(failed.phase, LoadPhase::Error);
        assert_eq!(failed.items.len(), 20);
        assert!(failed.error.is_some());

        assert_eq!(
            controller.fetch_next_page().await,
            FetchOutcome::Dropped(DropReason::AwaitingRefetch)
        );

        assert!(controller.refetch().await.is_appended());
        assert_eq!(*calls.borrow(), vec![1, 2, 2]);
        let recovered = controller.snapshot();
        assert!(recovered.error.is_none());
        assert_eq!(recovered.items, (0..40).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn refetch_without_failure_reloads_from_first_page() {
        let (calls, controller) = counting(45);
        controller.fetch_next_page().await;
        controller.fetch_next_page().await;

        controller.refetch().await;
        assert_eq!(*calls.borrow(), vec![1, 2, 1]);
        assert_eq!(controller.snapshot().items.len(), 20);
        assert_eq!(controller.cursor(), 2);
    }

    #[tokio::test]
    async fn empty_page_with_remaining_total_stalls_until_refetch() {
        let controller = CollectionController::new(
            QueryKey::new("shrinking"),
            20,
            fetch_fn(|cursor, size| {
                ready(Ok(if cursor == 2 {
                    Page::new(Vec::new(), 45)
                } else {
                    numbers(cursor, size, 45)
                }))
            }),
        );
        controller.fetch_next_page().await;
        controller.fetch_next_page().await;
        assert!(controller.snapshot().has_more);
        assert_eq!(
            controller.fetch_next_page().await,
            FetchOutcome::Dropped(DropReason::Stalled)
        );

        assert!(controller.refetch().await.is_appended());
        assert_eq!(
            controller.fetch_next_page().await,
            FetchOutcome::Appended {
                cursor: 2,
                received: 0,
                has_more: true
            }
        );
    }

    #[tokio::test]
    async fn concurrent_call_is_dropped_while_in_flight() {
        let (tx, rx) = futures_channel::oneshot::channel::<Page<u64>>();
        let pending = RefCell::new(Some(rx));
        let controller = CollectionController::new(
            QueryKey::new("slow"),
            20,
            fetch_fn(move |_, _| {
                let rx = pending.borrow_mut().take();
                async move {
                    match rx {
                        Some(rx) => rx.await.map_err(|e| ApiError::Network(e.to_string())),
                        None => Err(ApiError::Network("second request issued".into())),
                    }
                }
            }),
        );

        let first = controller.fetch_next_page();
        let second = async {
            let outcome = controller.fetch_next_page().await;
            assert!(controller.snapshot().is_loading);
            let _ = tx.send(Page::new(vec![1, 2, 3], 3));
            outcome
        };
        let (first, second) = join(first, second).await;

        assert_eq!(second, FetchOutcome::Dropped(DropReason::InFlight));
        assert!(first.is_appended());
        assert!(!controller.is_fetching());
        assert_eq!(controller.snapshot().items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn reset_is_refused_while_a_page_is_in_flight() {
        let (tx, rx) = futures_channel::oneshot::channel::<Page<u64>>();
        let pending = RefCell::new(Some(rx));
        let controller = CollectionController::new(
            QueryKey::new("slow"),
            20,
            fetch_fn(move |_, _| {
                let rx = pending.borrow_mut().take();
                async move {
                    match rx {
                        Some(rx) => rx.await.map_err(|e| ApiError::Network(e.to_string())),
                        None => Err(ApiError::Network("second request issued".into())),
                    }
                }
            }),
        );

        let first = controller.fetch_next_page();
        let interrupt = async {
            assert!(!controller.reset());
            assert_eq!(
                controller.refetch().await,
                FetchOutcome::Dropped(DropReason::InFlight)
            );
            let _ = tx.send(Page::new(vec![1, 2, 3], 3));
        };
        let (first, ()) = join(first, interrupt).await;

        assert!(first.is_appended());
        assert_eq!(controller.snapshot().items, vec![1, 2, 3]);
        assert!(controller.reset());
        assert!(controller.snapshot().items.is_empty());
    }

    #[tokio::test]
    async fn listeners_see_every_transition_until_unsubscribed() {
        let (_, controller) = counting(45);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = controller.subscribe(move |snapshot| {
            sink.borrow_mut().push((snapshot.phase, snapshot.items.len()));
        });

        controller.fetch_next_page().await;
        controller.fetch_next_page().await;
        assert_eq!(
            *seen.borrow(),
            vec![
                (LoadPhase::FetchingFirst, 0),
                (LoadPhase::Idle, 20),
                (LoadPhase::FetchingNext, 20),
                (LoadPhase::Idle, 40),
            ]
        );

        controller.unsubscribe(id);
        controller.fetch_next_page().await;
        assert_eq!(seen.borrow().len(), 4);
    }

    #[tokio::test]
    async fn key_change_resets_and_teardown_stops() {
        let (_, controller) = counting(45);
        controller.fetch_next_page().await;

        assert!(!controller.set_query_key(QueryKey::new("numbers")));
        assert!(controller.set_query_key(QueryKey::new("numbers").with(&1)));
        let snapshot = controller.snapshot();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.cursor, 1);
        assert!(!snapshot.is_settled);

        controller.teardown();
        assert!(!controller.needs_first_page());
        assert_eq!(
            controller.fetch_next_page().await,
            FetchOutcome::Dropped(DropReason::TornDown)
        );
        assert_eq!(
            controller.refetch().await,
            FetchOutcome::Dropped(DropReason::TornDown)
        );
    }
}
