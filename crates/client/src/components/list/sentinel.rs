//! The marker rendered after the last row of an incrementally loaded list.

use dioxus::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use crate::components::ui::{Button, ButtonVariant};

#[derive(Props, Clone, PartialEq)]
pub struct ScrollSentinelProps {
    /// DOM id of the marker; unique per page.
    pub id: String,
    pub has_more: bool,
    pub is_fetching: bool,
    pub on_approach: EventHandler<()>,
}

/// Browser: an `IntersectionObserver` watches the marker and calls
/// `on_approach` when it comes near the viewport.
#[cfg(target_arch = "wasm32")]
#[component]
pub fn ScrollSentinel(props: ScrollSentinelProps) -> Element {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::SCROLL_ROOT_ID;
    use crate::context::use_console;
    use crate::infinite::{ApproachCallback, IntersectionWatcher, SentinelBinding};

    let options = use_console().watcher_options();

    // Track props so the effects below re-run when they change
    let mut track_has_more = use_signal(|| props.has_more);
    let mut track_fetching = use_signal(|| props.is_fetching);
    if *track_has_more.peek() != props.has_more {
        track_has_more.set(props.has_more);
    }
    if *track_fetching.peek() != props.is_fetching {
        track_fetching.set(props.is_fetching);
    }

    // Bumped from the observer callback, which runs outside the render loop
    let mut approaches = use_signal(|| 0u64);

    let binding = use_hook(|| {
        let watcher = IntersectionWatcher::new(props.id.clone(), options).with_root(SCROLL_ROOT_ID);
        Rc::new(RefCell::new(SentinelBinding::new(watcher)))
    });

    let armed = binding.clone();
    use_effect(move || {
        let has_more = track_has_more();
        // Re-arm after each fetch so a marker still in view fires again
        let _ = track_fetching();
        let on_approach: ApproachCallback = Rc::new(move || {
            let mut approaches = approaches;
            *approaches.write() += 1;
        });
        armed.borrow_mut().update(has_more, on_approach);
    });

    let on_approach = props.on_approach;
    use_effect(move || {
        if approaches() > 0 {
            on_approach.call(());
        }
    });

    let detached = binding.clone();
    use_drop(move || detached.borrow_mut().detach());

    rsx! {
        div {
            id: "{props.id}",
            class: "h-px w-full",
            aria_hidden: "true",
        }
    }
}

/// Desktop: no observer is available, so the marker is a "Load more" button.
#[cfg(not(target_arch = "wasm32"))]
#[component]
pub fn ScrollSentinel(props: ScrollSentinelProps) -> Element {
    if !props.has_more {
        return rsx! {
            div { id: "{props.id}", class: "h-px w-full" }
        };
    }

    let on_approach = props.on_approach;
    rsx! {
        div { id: "{props.id}", class: "flex justify-center py-4",
            Button {
                variant: ButtonVariant::Secondary,
                disabled: props.is_fetching,
                onclick: move |_| on_approach.call(()),
                if props.is_fetching { "Loading..." } else { "Load more" }
            }
        }
    }
}
