//! Attack events aggregated by source IP, with a filter form.
//!
//! Applying a filter changes the list's query key, which restarts the list
//! from its first page.

use chrono::{DateTime, Duration, Utc};
use dioxus::prelude::*;
use ruiqi_shared::{AttackEventAggregate, AttackEventFilter};

use crate::components::ui::{Button, ButtonVariant};
use crate::components::{ListFooter, ScrollSentinel};
use crate::context::use_console;
use crate::hooks::use_infinite_list;
use crate::infinite::{fetch_fn, QueryKey};

/// Time range choices: (select value, label, hours back).
const RANGES: [(&str, &str, Option<i64>); 4] = [
    ("all", "All time", None),
    ("1h", "Last hour", Some(1)),
    ("24h", "Last 24 hours", Some(24)),
    ("7d", "Last 7 days", Some(24 * 7)),
];

/// Raw form input, converted by [`FilterDraft::to_filter`] on submit.
#[derive(Debug, Clone, Default, PartialEq)]
struct FilterDraft {
    src_ip: String,
    domain: String,
    dst_port: String,
    range: String,
}

impl FilterDraft {
    fn to_filter(&self, now: DateTime<Utc>) -> Result<AttackEventFilter, String> {
        let text = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        let dst_port = match self.dst_port.trim() {
            "" => None,
            port => Some(
                port.parse::<u16>()
                    .map_err(|_| format!("Invalid port: {port}"))?,
            ),
        };

        let hours = RANGES
            .iter()
            .find(|(value, _, _)| *value == self.range)
            .and_then(|(_, _, hours)| *hours);

        Ok(AttackEventFilter {
            src_ip: text(&self.src_ip),
            domain: text(&self.domain),
            dst_port,
            start_time: hours.map(|h| now - Duration::hours(h)),
            end_time: hours.map(|_| now),
            ..Default::default()
        })
    }
}

#[component]
pub fn AttackEvents() -> Element {
    let ctx = use_console();
    let mut filter = use_signal(AttackEventFilter::default);
    let mut draft = use_signal(FilterDraft::default);
    let mut form_error = use_signal(|| None::<String>);

    let list = use_infinite_list(
        move || QueryKey::new("attack-events").with(&*filter.read()),
        ctx.page_size(),
        move || {
            fetch_fn(move |page, size| {
                let client = ctx.client();
                let filter = filter.peek().clone();
                async move { client.list_attack_events(&filter, page, size).await }
            })
        },
    );
    let state = list.snapshot();

    let mut apply = move || {
        let parsed = draft.read().to_filter(Utc::now());
        match parsed {
            Ok(next) => {
                form_error.set(None);
                filter.set(next);
            }
            Err(message) => form_error.set(Some(message)),
        }
    };

    rsx! {
        div { class: "mx-auto max-w-6xl",
            div { class: "mb-4 flex items-center justify-between",
                h1 { class: "text-2xl font-semibold", "Attack Events" }
                Button {
                    variant: ButtonVariant::Ghost,
                    disabled: state.phase.is_fetching(),
                    onclick: move |_| list.refetch(),
                    "Refresh"
                }
            }

            form {
                class: "mb-6 flex flex-wrap items-end gap-3 rounded-lg border border-slate-800 bg-slate-900 p-4",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    apply();
                },
                FilterInput {
                    label: "Source IP",
                    value: draft.read().src_ip.clone(),
                    oninput: move |v| draft.write().src_ip = v,
                }
                FilterInput {
                    label: "Domain",
                    value: draft.read().domain.clone(),
                    oninput: move |v| draft.write().domain = v,
                }
                FilterInput {
                    label: "Port",
                    value: draft.read().dst_port.clone(),
                    oninput: move |v| draft.write().dst_port = v,
                }
                label { class: "flex flex-col gap-1 text-xs text-slate-400",
                    "Time range"
                    select {
                        class: "h-8 rounded border border-slate-700 bg-slate-950 px-2 text-sm text-slate-100",
                        value: "{draft.read().range}",
                        onchange: move |evt| draft.write().range = evt.value(),
                        for (value, label, _) in RANGES {
                            option { key: "{value}", value, "{label}" }
                        }
                    }
                }
                div { class: "flex gap-2",
                    Button {
                        variant: ButtonVariant::Secondary,
                        onclick: move |_| {
                            draft.set(FilterDraft::default());
                            form_error.set(None);
                            // Same key: the list would not reload on its own
                            if filter.peek().is_empty() {
                                list.reset();
                            } else {
                                filter.set(AttackEventFilter::default());
                            }
                        },
                        "Reset"
                    }
                    Button { r#type: "submit".to_string(), "Search" }
                }
                if let Some(message) = form_error() {
                    p { class: "w-full text-xs text-red-400", "{message}" }
                }
            }

            table { class: "w-full text-left text-sm",
                thead { class: "border-b border-slate-800 text-xs uppercase text-slate-500",
                    tr {
                        th { class: "py-2 pr-4", "Source" }
                        th { class: "py-2 pr-4", "Target" }
                        th { class: "py-2 pr-4", "Attacks" }
                        th { class: "py-2 pr-4", "First seen" }
                        th { class: "py-2", "Last seen" }
                    }
                }
                tbody {
                    for (index, event) in state.items.iter().enumerate() {
                        AttackEventRow {
                            key: "{index}-{event.src_ip}-{event.domain}",
                            event: event.clone(),
                        }
                    }
                }
            }
            ScrollSentinel {
                id: "attack-events-sentinel",
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
fn FilterInput(label: String, value: String, oninput: EventHandler<String>) -> Element {
    rsx! {
        label { class: "flex flex-col gap-1 text-xs text-slate-400",
            "{label}"
            input {
                class: "h-8 w-44 rounded border border-slate-700 bg-slate-950 px-2 text-sm text-slate-100",
                value,
                oninput: move |evt| oninput.call(evt.value()),
            }
        }
    }
}

#[component]
fn AttackEventRow(event: AttackEventAggregate) -> Element {
    let location = event
        .src_ip_info
        .as_ref()
        .and_then(|info| info.location())
        .unwrap_or_default();
    let first = event.first_attack_time.format("%Y-%m-%d %H:%M").to_string();
    let last = event.last_attack_time.format("%Y-%m-%d %H:%M").to_string();

    rsx! {
        tr { class: "border-b border-slate-900",
            td { class: "py-2 pr-4",
                p { class: "font-mono", "{event.src_ip}" }
                if !location.is_empty() {
                    p { class: "text-xs text-slate-500", "{location}" }
                }
            }
            td { class: "py-2 pr-4 text-slate-300", "{event.domain}:{event.dst_port}" }
            td { class: "py-2 pr-4", "{event.count}" }
            td { class: "py-2 pr-4 text-slate-400", "{first}" }
            td { class: "py-2 text-slate-400",
                "{last}"
                if event.is_ongoing {
                    span { class: "ml-2 rounded bg-red-500/15 px-1.5 py-0.5 text-xs text-red-300", "Ongoing" }
                }
            }
        }
    }
}
