//! Viewport proximity detection for list sentinels.
//!
//! A watcher reports when the sentinel rendered after the last loaded row
//! comes within `lookahead_margin` pixels of the visible area with at least
//! `threshold` of it showing. Only the transition from "not approaching" to
//! "approaching" fires; staying in view does not fire again until the
//! watcher is re-armed.

use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
mod intersection_wasm;
#[cfg(target_arch = "wasm32")]
pub use intersection_wasm::IntersectionWatcher;

pub type ApproachCallback = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatcherOptions {
    /// Visible fraction of the sentinel at which it counts as approaching.
    pub threshold: f64,
    /// Extra distance in pixels above and below the viewport.
    pub lookahead_margin: f64,
}

impl Default for WatcherOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            lookahead_margin: 100.0,
        }
    }
}

pub trait ViewportProximityWatcher {
    /// Start watching. Replaces any previous callback and re-arms the
    /// edge, so a sentinel already in view fires on the next observation.
    fn subscribe(&mut self, on_approach: ApproachCallback);

    fn unsubscribe(&mut self);

    fn is_subscribed(&self) -> bool;
}

/// Rising-edge detector shared by the watcher implementations.
#[derive(Debug, Default, Clone)]
pub struct ApproachEdge {
    approaching: bool,
}

impl ApproachEdge {
    /// Record the latest observation; `true` on a not-approaching to
    /// approaching transition.
    pub fn observe(&mut self, approaching: bool) -> bool {
        let rising = approaching && !self.approaching;
        self.approaching = approaching;
        rising
    }

    pub fn reset(&mut self) {
        self.approaching = false;
    }
}

/// Vertical extent in scroll-content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub length: f64,
}

impl Span {
    pub fn new(start: f64, length: f64) -> Self {
        Self {
            start,
            length: length.max(0.0),
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

/// Fraction of `sentinel` inside `viewport` grown by `margin` on both ends.
///
/// A zero-height sentinel is either fully visible or not at all.
pub fn intersection_ratio(viewport: Span, sentinel: Span, margin: f64) -> f64 {
    let top = viewport.start - margin;
    let bottom = viewport.end() + margin;

    if sentinel.length == 0.0 {
        return if sentinel.start >= top && sentinel.start <= bottom {
            1.0
        } else {
            0.0
        };
    }

    let visible = sentinel.end().min(bottom) - sentinel.start.max(top);
    (visible.max(0.0) / sentinel.length).clamp(0.0, 1.0)
}

pub fn is_approaching(viewport: Span, sentinel: Span, options: &WatcherOptions) -> bool {
    let ratio = intersection_ratio(viewport, sentinel, options.lookahead_margin);
    ratio > 0.0 && ratio >= options.threshold
}

/// Watcher driven by explicit samples of the viewport and sentinel
/// positions, for hosts that only offer scroll events or polling.
///
/// Host-agnostic reference for the browser `IntersectionWatcher`: same
/// margin, threshold and rising-edge rules, exercised by the tests below.
/// The desktop console does not sample; its sentinel is a "Load more"
/// button.
pub struct ScrollSampler {
    options: WatcherOptions,
    on_approach: Option<ApproachCallback>,
    edge: ApproachEdge,
}

impl ScrollSampler {
    pub fn new(options: WatcherOptions) -> Self {
        Self {
            options,
            on_approach: None,
            edge: ApproachEdge::default(),
        }
    }

    pub fn options(&self) -> &WatcherOptions {
        &self.options
    }

    /// Feed one observation; returns whether `on_approach` fired.
    pub fn sample(&mut self, viewport: Span, sentinel: Span) -> bool {
        let Some(on_approach) = self.on_approach.clone() else {
            return false;
        };
        let fired = self
            .edge
            .observe(is_approaching(viewport, sentinel, &self.options));
        if fired {
            on_approach();
        }
        fired
    }
}

impl ViewportProximityWatcher for ScrollSampler {
    fn subscribe(&mut self, on_approach: ApproachCallback) {
        self.on_approach = Some(on_approach);
        self.edge.reset();
    }

    fn unsubscribe(&mut self) {
        self.on_approach = None;
        self.edge.reset();
    }

    fn is_subscribed(&self) -> bool {
        self.on_approach.is_some()
    }
}

/// Keeps a watcher attached to a sentinel only while there is more to load.
///
/// Call [`SentinelBinding::update`] whenever `has_more` or the fetching
/// state changes. Dropping the binding unsubscribes.
pub struct SentinelBinding<W: ViewportProximityWatcher> {
    watcher: W,
}

impl<W: ViewportProximityWatcher> SentinelBinding<W> {
    pub fn new(watcher: W) -> Self {
        Self { watcher }
    }

    /// Re-arm the watcher while `has_more`, detach it otherwise.
    pub fn update(&mut self, has_more: bool, on_approach: ApproachCallback) {
        self.watcher.unsubscribe();
        if has_more {
            self.watcher.subscribe(on_approach);
        }
    }

    pub fn detach(&mut self) {
        self.watcher.unsubscribe();
    }

    pub fn is_active(&self) -> bool {
        self.watcher.is_subscribed()
    }

    pub fn watcher(&self) -> &W {
        &self.watcher
    }

    pub fn watcher_mut(&mut self) -> &mut W {
        &mut self.watcher
    }
}

impl<W: ViewportProximityWatcher> Drop for SentinelBinding<W> {
    fn drop(&mut self) {
        self.watcher.unsubscribe();
    }
}
