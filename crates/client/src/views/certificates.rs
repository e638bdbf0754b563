//! TLS certificates table with manual refresh.

use chrono::Utc;
use dioxus::prelude::*;
use ruiqi_shared::Certificate;

use crate::components::ui::{Button, ButtonVariant};
use crate::components::{ListFooter, ScrollSentinel};
use crate::context::use_console;
use crate::hooks::use_infinite_list;
use crate::infinite::{fetch_fn, QueryKey};

#[component]
pub fn Certificates() -> Element {
    let ctx = use_console();
    let list = use_infinite_list(
        || QueryKey::new("certificates"),
        ctx.page_size(),
        move || {
            fetch_fn(move |page, size| {
                let client = ctx.client();
                async move { client.list_certificates(page, size).await }
            })
        },
    );
    let state = list.snapshot();
    let now = Utc::now();

    rsx! {
        div { class: "mx-auto max-w-6xl",
            div { class: "mb-6 flex items-center justify-between",
                h1 { class: "text-2xl font-semibold", "Certificates" }
                Button {
                    variant: ButtonVariant::Secondary,
                    disabled: state.phase.is_fetching(),
                    onclick: move |_| list.refetch(),
                    "Refresh"
                }
            }
            table { class: "w-full text-left text-sm",
                thead { class: "border-b border-slate-800 text-xs uppercase text-slate-500",
                    tr {
                        th { class: "py-2 pr-4", "Name" }
                        th { class: "py-2 pr-4", "Domains" }
                        th { class: "py-2 pr-4", "Issuer" }
                        th { class: "py-2", "Expires" }
                    }
                }
                tbody {
                    for cert in state.items.iter() {
                        CertificateRow { key: "{cert.id}", cert: cert.clone(), expired: cert.is_expired_at(now) }
                    }
                }
            }
            ScrollSentinel {
                id: "certificates-sentinel",
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
fn CertificateRow(cert: Certificate, expired: bool) -> Element {
    let domains = cert.domains.join(", ");
    let expires = cert.expire_date.format("%Y-%m-%d").to_string();

    rsx! {
        tr { class: "border-b border-slate-900",
            td { class: "py-2 pr-4 font-medium",
                "{cert.name}"
                if let Some(description) = &cert.description {
                    p { class: "text-xs text-slate-500", "{description}" }
                }
            }
            td { class: "py-2 pr-4 text-slate-400", "{domains}" }
            td { class: "py-2 pr-4 text-slate-400", "{cert.issuer_name}" }
            td { class: "py-2",
                if expired {
                    span { class: "rounded bg-red-500/15 px-2 py-0.5 text-xs text-red-300", "Expired {expires}" }
                } else {
                    span { class: "text-slate-300", "{expires}" }
                }
            }
        }
    }
}
