use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use super::{ApproachCallback, ApproachEdge, ViewportProximityWatcher, WatcherOptions};
use crate::log_warn;

type EntriesCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Browser `IntersectionObserver` attached to the element with `element_id`.
///
/// Observes against the viewport unless a scroll container is set with
/// [`IntersectionWatcher::with_root`]; the lookahead margin only extends the
/// root, not intermediate scroll containers.
pub struct IntersectionWatcher {
    element_id: String,
    root_id: Option<String>,
    options: WatcherOptions,
    observer: Option<IntersectionObserver>,
    // Kept alive for as long as the observer may call it.
    callback: Option<EntriesCallback>,
}

impl IntersectionWatcher {
    pub fn new(element_id: impl Into<String>, options: WatcherOptions) -> Self {
        Self {
            element_id: element_id.into(),
            root_id: None,
            options,
            observer: None,
            callback: None,
        }
    }

    pub fn with_root(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }

    fn observe(&mut self, on_approach: ApproachCallback) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let element = document
            .get_element_by_id(&self.element_id)
            .ok_or_else(|| JsValue::from_str("sentinel element not found"))?;

        let mut edge = ApproachEdge::default();
        let threshold = self.options.threshold;
        let callback: EntriesCallback = Closure::new(move |entries: Array, _: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                let approaching = entry.is_intersecting()
                    && entry.intersection_ratio() >= threshold.min(1.0);
                if edge.observe(approaching) {
                    on_approach();
                }
            }
        });

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&format!("{}px 0px", self.options.lookahead_margin));
        init.set_threshold(&JsValue::from_f64(threshold));
        if let Some(root) = self.root_id.as_deref().and_then(|id| document.get_element_by_id(id)) {
            Reflect::set(&init, &JsValue::from_str("root"), &root)?;
        }
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        observer.observe(&element);

        self.observer = Some(observer);
        self.callback = Some(callback);
        Ok(())
    }
}

impl ViewportProximityWatcher for IntersectionWatcher {
    fn subscribe(&mut self, on_approach: ApproachCallback) {
        self.unsubscribe();
        if let Err(e) = self.observe(on_approach) {
            log_warn!("Cannot watch #{}: {:?}", self.element_id, e);
        }
    }

    fn unsubscribe(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.callback = None;
    }

    fn is_subscribed(&self) -> bool {
        self.observer.is_some()
    }
}

impl Drop for IntersectionWatcher {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
