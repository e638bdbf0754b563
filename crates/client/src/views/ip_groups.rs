use dioxus::prelude::*;
use ruiqi_shared::IpGroup;

use crate::api_client::IP_GROUPS;
use crate::components::{ListFooter, ScrollSentinel};
use crate::context::use_console;
use crate::hooks::use_infinite_list;
use crate::infinite::{ApiPageFetcher, QueryKey};

/// Addresses shown per group before collapsing into "+N more".
const PREVIEW_ADDRESSES: usize = 4;

#[component]
pub fn IpGroups() -> Element {
    let ctx = use_console();
    let list = use_infinite_list(
        || QueryKey::new("ip-groups"),
        ctx.page_size(),
        move || ApiPageFetcher::<IpGroup>::new(ctx.client(), IP_GROUPS),
    );
    let state = list.snapshot();

    rsx! {
        div { class: "mx-auto max-w-4xl",
            h1 { class: "mb-6 text-2xl font-semibold", "IP Groups" }
            ul { class: "divide-y divide-slate-800 rounded-lg border border-slate-800",
                for group in state.items.iter() {
                    li { key: "{group.id}", class: "flex items-start justify-between gap-4 p-4",
                        div {
                            p { class: "font-medium", "{group.name}" }
                            p { class: "mt-1 font-mono text-xs text-slate-400", {preview(group)} }
                        }
                        span { class: "shrink-0 text-xs text-slate-500", "{group.items.len()} entries" }
                    }
                }
            }
            ScrollSentinel {
                id: "ip-groups-sentinel",
                has_more: state.has_more,
                is_fetching: state.phase.is_fetching(),
                on_approach: move |_| list.fetch_next_page(),
            }
            ListFooter {
                loaded: state.items.len(),
                total: state.total,
                is_loading: state.is_loading,
                is_fetching_next_page: state.is_fetching_next_page,
                exhausted: state.is_exhausted(),
                error: state.error.clone(),
                on_retry: move |_| list.refetch(),
            }
        }
    }
}

fn preview(group: &IpGroup) -> String {
    let shown = group
        .items
        .iter()
        .take(PREVIEW_ADDRESSES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    match group.items.len().saturating_sub(PREVIEW_ADDRESSES) {
        0 => shown,
        rest => format!("{shown} +{rest} more"),
    }
}
