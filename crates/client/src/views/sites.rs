//! Protected sites, shown as a card grid.

use dioxus::prelude::*;
use ruiqi_shared::{Site, WafMode};

use crate::components::{ListFooter, ScrollSentinel};
use crate::context::use_console;
use crate::hooks::use_infinite_list;
use crate::infinite::{fetch_fn, QueryKey};

#[component]
pub fn Sites() -> Element {
    let ctx = use_console();
    let list = use_infinite_list(
        || QueryKey::new("sites"),
        ctx.page_size(),
        move || {
            fetch_fn(move |page, size| {
                let client = ctx.client();
                async move { client.list_sites(page, size).await }
            })
        },
    );
    let state = list.snapshot();

    rsx! {
        div { class: "mx-auto max-w-6xl",
            h1 { class: "mb-6 text-2xl font-semibold", "Sites" }
            div { class: "grid grid-cols-1 gap-4 md:grid-cols-2 xl:grid-cols-3",
                for site in state.items.iter() {
                    SiteCard { key: "{site.id}", site: site.clone() }
                }
            }
            ScrollSentinel {
                id: "sites-sentinel",
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

#[component]
fn SiteCard(site: Site) -> Element {
    let mode_class = match site.waf_mode {
        WafMode::Protection => "bg-emerald-500/15 text-emerald-300",
        WafMode::Observation => "bg-amber-500/15 text-amber-300",
    };
    let status = if site.active_status { "Active" } else { "Inactive" };
    let upstreams = site.backend.servers.len();

    rsx! {
        div { class: "rounded-lg border border-slate-800 bg-slate-900 p-4",
            div { class: "mb-2 flex items-center justify-between gap-2",
                h3 { class: "truncate font-medium", "{site.name}" }
                span { class: "rounded px-2 py-0.5 text-xs {mode_class}", "{site.waf_mode.label()}" }
            }
            p { class: "truncate text-sm text-slate-400", "{site.public_url()}" }
            div { class: "mt-3 flex flex-wrap gap-3 text-xs text-slate-500",
                span { "{status}" }
                span { "{upstreams} upstream(s)" }
                if let Some(cert) = &site.certificate {
                    span { title: "{cert.issuer_name}", "TLS: {cert.cert_name}" }
                }
            }
        }
    }
}
