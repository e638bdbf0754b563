use dioxus::prelude::*;
use ruiqi_shared::ApiError;

use crate::components::ui::{Button, ButtonVariant};

#[derive(Props, Clone, PartialEq)]
pub struct ListFooterProps {
    pub loaded: usize,
    pub total: u64,
    pub is_loading: bool,
    pub is_fetching_next_page: bool,
    /// A page has been received and no more are available.
    pub exhausted: bool,
    #[props(!optional)]
    pub error: Option<ApiError>,
    pub on_retry: EventHandler<()>,
}

/// Status line under a list: progress, failure with retry, or end of data.
#[component]
pub fn ListFooter(props: ListFooterProps) -> Element {
    if let Some(error) = &props.error {
        let on_retry = props.on_retry;
        return rsx! {
            div { class: "flex items-center justify-between gap-4 rounded-lg border border-red-500/30 bg-red-500/10 px-4 py-3 text-sm text-red-300",
                span { "{error.user_message()}" }
                Button {
                    variant: ButtonVariant::Secondary,
                    onclick: move |_| on_retry.call(()),
                    "Retry"
                }
            }
        };
    }

    if props.is_loading || props.is_fetching_next_page {
        return rsx! {
            div { class: "flex items-center justify-center gap-2 py-4 text-sm text-gray-400",
                span { class: "h-4 w-4 animate-spin rounded-full border-2 border-gray-500 border-t-transparent" }
                "Loading..."
            }
        };
    }

    if props.exhausted && props.loaded == 0 {
        return rsx! {
            div { class: "py-12 text-center text-sm text-gray-400", "No data" }
        };
    }

    if props.exhausted {
        return rsx! {
            div { class: "py-4 text-center text-xs text-gray-500",
                "All {props.loaded} loaded"
            }
        };
    }

    rsx! {
        div { class: "py-4 text-center text-xs text-gray-500",
            "{props.loaded} of {props.total}"
        }
    }
}
