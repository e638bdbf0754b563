//! Single-flight guard for page requests.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

/// Ensures at most one page request is in flight for a collection.
///
/// Clones share the same flag. A new collection instance gets a new guard,
/// so a request left over from a superseded query never blocks the next one.
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyGuard {
    in_flight: Rc<Cell<bool>>,
}

/// Proof that the holder owns the guard's single slot.
///
/// Dropping it releases the slot, also when the request future is dropped
/// before it settles.
#[derive(Debug)]
pub struct FetchPermit {
    in_flight: Rc<Cell<bool>>,
}

impl Drop for FetchPermit {
    fn drop(&mut self) {
        self.in_flight.set(false);
    }
}

impl ConcurrencyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.get()
    }

    /// Take the slot, or `None` if a request is already in flight.
    pub fn try_acquire(&self) -> Option<FetchPermit> {
        if self.in_flight.replace(true) {
            return None;
        }
        Some(FetchPermit {
            in_flight: Rc::clone(&self.in_flight),
        })
    }

    /// Run `fetch` unless a request is already in flight.
    ///
    /// Returns `None` when the call was dropped. `fetch` is invoked
    /// synchronously after the slot is taken, and the slot is released
    /// before the result is handed back, so callers observe
    /// `is_fetching() == false` when they publish the outcome.
    pub async fn request_next<F, Fut, R>(&self, fetch: F) -> Option<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        let permit = self.try_acquire()?;
        let result = fetch().await;
        drop(permit);
        Some(result)
    }
}
