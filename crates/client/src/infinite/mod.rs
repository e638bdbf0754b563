//! Incremental paginated collection loading for the console's list views.
//!
//! This module provides:
//! - An accumulator that merges fetched pages into one ordered collection
//! - A guard that keeps at most one page request in flight per collection
//! - Viewport proximity watchers that trigger the next page near the end of the list
//! - A controller tying them together and resetting when the query key changes
//!
//! # Architecture
//!
//! ```text
//!   ┌──────────────────────────┐
//!   │ ViewportProximityWatcher │  sentinel approaches the viewport
//!   └──────────────────────────┘
//!                │ on_approach
//!                ▼
//!   ┌──────────────────────────┐
//!   │   CollectionController   │  query key, generation, phase
//!   └──────────────────────────┘
//!                │ fetch_next_page()
//!                ▼
//!   ┌──────────────────────────┐
//!   │     ConcurrencyGuard     │  drops triggers while a fetch is in flight
//!   └──────────────────────────┘
//!                │
//!                ▼
//!   ┌──────────────────────────┐
//!   │       PageFetcher        │  GET <resource>?page=N&size=M
//!   └──────────────────────────┘
//!                │ Page<T>
//!                ▼
//!   ┌──────────────────────────┐
//!   │  CollectionAccumulator   │  items, has_more, cursor
//!   └──────────────────────────┘
//!                │ LoaderSnapshot<T>
//!                ▼
//!            listeners (UI)
//! ```
//!
//! Everything here is single-threaded and runtime-agnostic: futures are
//! `!Send`, state lives in `Rc`/`RefCell`, and nothing spawns. The Dioxus
//! binding lives in [`crate::hooks::use_infinite_list`].
//!
//! ```rust,ignore
//! let controller = CollectionController::new(
//!     QueryKey::new("sites"),
//!     20,
//!     ApiPageFetcher::<Site>::new(client, api_client::SITES),
//! );
//! controller.fetch_next_page().await;
//! let snapshot = controller.snapshot();
//! ```

mod accumulator;
mod controller;
mod fetcher;
mod guard;
mod state;
mod watcher;

pub use accumulator::CollectionAccumulator;
pub use controller::{CollectionController, ListenerId};
pub use fetcher::{fetch_fn, ApiPageFetcher, FnFetcher, PageFetcher};
pub use guard::{ConcurrencyGuard, FetchPermit};
pub use state::{DropReason, FetchOutcome, LoadPhase, LoaderSnapshot, QueryKey};
pub use watcher::{
    intersection_ratio, is_approaching, ApproachCallback, ApproachEdge, ScrollSampler,
    SentinelBinding, Span, ViewportProximityWatcher, WatcherOptions,
};

#[cfg(target_arch = "wasm32")]
pub use watcher::IntersectionWatcher;
