//! Loader scenarios driven by scripted page sources.

use std::cell::RefCell;
use std::rc::Rc;

use futures_channel::oneshot;
use futures_util::future::{join, ready};
use ruiqi_console::infinite::{
    fetch_fn, CollectionController, DropReason, FetchOutcome, LoadPhase, QueryKey,
};
use ruiqi_shared::{ApiError, Page};

/// Rows served by offset pagination; tests mutate it between requests.
fn table_backed(rows: Rc<RefCell<Vec<u32>>>, page_size: u32) -> CollectionController<u32> {
    CollectionController::new(
        QueryKey::new("rows"),
        page_size,
        fetch_fn(move |cursor, size| {
            let rows = rows.borrow();
            let start = ((cursor - 1) * size) as usize;
            let page: Vec<u32> = rows.iter().skip(start).take(size as usize).copied().collect();
            ready(Ok::<_, ApiError>(Page::new(page, rows.len() as u64)))
        }),
    )
}

type Reply = oneshot::Sender<Result<Page<u32>, ApiError>>;
type Requests = Rc<RefCell<Vec<(u32, Reply)>>>;

/// Every request parks until the test answers it through `Requests`.
fn manual(key: &str) -> (Requests, CollectionController<u32>) {
    let requests: Requests = Rc::new(RefCell::new(Vec::new()));
    let queue = Rc::clone(&requests);
    let controller = CollectionController::new(
        QueryKey::new(key),
        20,
        fetch_fn(move |cursor, _| {
            let (tx, rx) = oneshot::channel();
            queue.borrow_mut().push((cursor, tx));
            async move {
                rx.await
                    .unwrap_or_else(|_| Err(ApiError::Network("request abandoned".into())))
            }
        }),
    );
    (requests, controller)
}

fn take_requests(requests: &Requests) -> Vec<(u32, Reply)> {
    std::mem::take(&mut *requests.borrow_mut())
}

#[tokio::test]
async fn forty_five_rows_load_in_three_pages() {
    let rows = Rc::new(RefCell::new((0..45).collect::<Vec<u32>>()));
    let controller = table_backed(rows, 20);

    let mut sizes = Vec::new();
    let mut more = Vec::new();
    while let FetchOutcome::Appended {
        received, has_more, ..
    } = controller.fetch_next_page().await
    {
        sizes.push(received);
        more.push(has_more);
    }

    assert_eq!(sizes, vec![20, 20, 5]);
    assert_eq!(more, vec![true, true, false]);
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.items, (0..45).collect::<Vec<_>>());
    assert_eq!(snapshot.total, 45);
    assert!(snapshot.is_exhausted());
}

#[tokio::test]
async fn rows_deleted_between_pages_end_the_list_early() {
    let rows = Rc::new(RefCell::new((0..45).collect::<Vec<u32>>()));
    let controller = table_backed(Rc::clone(&rows), 20);

    controller.fetch_next_page().await;
    controller.fetch_next_page().await;
    assert!(controller.snapshot().has_more);

    rows.borrow_mut().drain(0..2);
    let third = controller.fetch_next_page().await;
    assert_eq!(
        third,
        FetchOutcome::Appended {
            cursor: 3,
            received: 3,
            has_more: false
        }
    );

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.items.len(), 43);
    assert_eq!(snapshot.total, 43);
    assert_eq!(
        controller.fetch_next_page().await,
        FetchOutcome::Dropped(DropReason::Exhausted)
    );
}

#[tokio::test]
async fn response_for_a_replaced_key_is_discarded() {
    let (requests, controller) = manual("events:{}");

    let old = controller.fetch_next_page();
    let switch = async {
        assert!(controller.set_query_key(QueryKey::new("events:{\"domain\":\"a.example\"}")));
        let snapshot = controller.snapshot();
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.cursor, 1);

        // The new key is not blocked by the old request still in flight.
        let fresh = controller.fetch_next_page();
        let answer = async {
            let mut pending = take_requests(&requests);
            assert_eq!(pending.len(), 2);
            let (fresh_cursor, fresh_tx) = pending.remove(1);
            let (old_cursor, old_tx) = pending.remove(0);
            assert_eq!((old_cursor, fresh_cursor), (1, 1));
            let _ = fresh_tx.send(Ok(Page::new(vec![100, 101], 2)));
            let _ = old_tx.send(Ok(Page::new(vec![1, 2, 3], 30)));
        };
        join(fresh, answer).await.0
    };

    let (old, fresh) = join(old, switch).await;
    assert_eq!(old, FetchOutcome::Stale);
    assert!(fresh.is_appended());

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.items, vec![100, 101]);
    assert_eq!(snapshot.total, 2);
    assert!(!controller.is_fetching());
}

#[tokio::test]
async fn second_call_while_fetching_changes_nothing() {
    let (requests, controller) = manual("sites");

    let first = controller.fetch_next_page();
    let second = async {
        let before = controller.snapshot();
        let outcome = controller.fetch_next_page().await;
        assert_eq!(controller.snapshot(), before);
        assert_eq!(requests.borrow().len(), 1);

        for (_, tx) in take_requests(&requests) {
            let _ = tx.send(Ok(Page::new((0..20).collect(), 25)));
        }
        outcome
    };

    let (first, second) = join(first, second).await;
    assert_eq!(second, FetchOutcome::Dropped(DropReason::InFlight));
    assert_eq!(
        first,
        FetchOutcome::Appended {
            cursor: 1,
            received: 20,
            has_more: true
        }
    );
}

#[tokio::test]
async fn refetch_while_a_page_is_loading_keeps_loaded_rows() {
    let (requests, controller) = manual("sites");

    let first = controller.fetch_next_page();
    let answer_first = async {
        for (_, tx) in take_requests(&requests) {
            let _ = tx.send(Ok(Page::new((0..20).collect(), 45)));
        }
    };
    join(first, answer_first).await;

    let second = controller.fetch_next_page();
    let double_click = async {
        assert_eq!(
            controller.refetch().await,
            FetchOutcome::Dropped(DropReason::InFlight)
        );
        assert!(!controller.reset());
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.items.len(), 20);
        assert!(snapshot.is_fetching_next_page);

        let pending = take_requests(&requests);
        assert_eq!(
            pending.iter().map(|(cursor, _)| *cursor).collect::<Vec<_>>(),
            vec![2]
        );
        for (_, tx) in pending {
            let _ = tx.send(Ok(Page::new((20..40).collect(), 45)));
        }
    };

    let (second, ()) = join(second, double_click).await;
    assert!(second.is_appended());
    assert_eq!(controller.snapshot().items, (0..40).collect::<Vec<_>>());
    assert_eq!(controller.cursor(), 3);
}

#[tokio::test]
async fn first_page_failure_retries_as_a_first_load() {
    let (requests, controller) = manual("alert-channels");

    let first = controller.fetch_next_page();
    let fail = async {
        for (_, tx) in take_requests(&requests) {
            let _ = tx.send(Err(ApiError::Network("connection refused".into())));
        }
    };
    let (failed, ()) = join(first, fail).await;
    assert!(matches!(failed, FetchOutcome::Failed(ApiError::Network(_))));
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, LoadPhase::Error);
    assert!(!snapshot.is_settled);
    assert!(!snapshot.is_loading);

    let retry = controller.refetch();
    let observe = async {
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, LoadPhase::FetchingFirst);
        assert!(snapshot.is_loading);
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.cursor, 1);

        let pending = take_requests(&requests);
        assert_eq!(pending.len(), 1);
        for (cursor, tx) in pending {
            assert_eq!(cursor, 1);
            let _ = tx.send(Ok(Page::new(vec![7, 8], 2)));
        }
    };
    let (retried, ()) = join(retry, observe).await;

    assert_eq!(
        retried,
        FetchOutcome::Appended {
            cursor: 1,
            received: 2,
            has_more: false
        }
    );
    assert!(controller.snapshot().is_exhausted());
}

#[tokio::test]
async fn refetch_after_failure_repeats_the_failed_cursor() {
    let attempts = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&attempts);
    let controller = CollectionController::new(
        QueryKey::new("certificates"),
        2,
        fetch_fn(move |cursor, size| {
            seen.borrow_mut().push(cursor);
            let failing = cursor == 2 && seen.borrow().iter().filter(|c| **c == 2).count() == 1;
            ready(if failing {
                Err(ApiError::Server {
                    status: 503,
                    message: "upstream unavailable".into(),
                    request_id: Some("req-7".into()),
                })
            } else {
                let start = (cursor - 1) * size;
                Ok(Page::new((start..start + size).collect::<Vec<u32>>(), 6))
            })
        }),
    );

    controller.fetch_next_page().await;
    let failed = controller.fetch_next_page().await;
    assert!(matches!(failed, FetchOutcome::Failed(ref e) if e.is_transient()));
    assert_eq!(controller.phase(), LoadPhase::Error);
    assert_eq!(controller.snapshot().error.and_then(|e| e.status()), Some(503));

    assert!(controller.refetch().await.is_appended());
    controller.fetch_next_page().await;

    assert_eq!(*attempts.borrow(), vec![1, 2, 2, 3]);
    assert_eq!(controller.snapshot().items, vec![0, 1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn teardown_discards_the_pending_page_silently() {
    let (requests, controller) = manual("ip-groups");
    let notified = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&notified);
    controller.subscribe(move |_| *counter.borrow_mut() += 1);

    let pending = controller.fetch_next_page();
    let unmount = async {
        assert_eq!(*notified.borrow(), 1);
        controller.teardown();
        for (_, tx) in take_requests(&requests) {
            let _ = tx.send(Ok(Page::new(vec![1], 1)));
        }
    };

    let (outcome, ()) = join(pending, unmount).await;
    assert_eq!(outcome, FetchOutcome::Stale);
    assert_eq!(*notified.borrow(), 1);
    assert!(controller.snapshot().items.is_empty());
}
