//! Micro rules table, ordered by the backend.

use dioxus::prelude::*;
use ruiqi_shared::{MicroRule, RuleStatus, RuleType};

use crate::components::ui::{Button, ButtonVariant};
use crate::components::{ListFooter, ScrollSentinel};
use crate::context::use_console;
use crate::hooks::use_infinite_list;
use crate::infinite::{fetch_fn, QueryKey};

#[component]
pub fn MicroRules() -> Element {
    let ctx = use_console();
    let list = use_infinite_list(
        || QueryKey::new("micro-rules"),
        ctx.page_size(),
        move || {
            fetch_fn(move |page, size| {
                let client = ctx.client();
                async move { client.list_micro_rules(page, size).await }
            })
        },
    );
    let state = list.snapshot();

    rsx! {
        div { class: "mx-auto max-w-6xl",
            div { class: "mb-6 flex items-center justify-between",
                h1 { class: "text-2xl font-semibold", "Micro Rules" }
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
                        th { class: "py-2 pr-4", "Type" }
                        th { class: "py-2 pr-4", "Status" }
                        th { class: "py-2 pr-4", "Priority" }
                        th { class: "py-2", "Condition" }
                    }
                }
                tbody {
                    for rule in state.items.iter() {
                        MicroRuleRow { key: "{rule.id}", rule: rule.clone() }
                    }
                }
            }
            ScrollSentinel {
                id: "micro-rules-sentinel",
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
fn MicroRuleRow(rule: MicroRule) -> Element {
    let (type_label, type_class) = match rule.rule_type {
        RuleType::Whitelist => ("Whitelist", "border border-slate-600 text-slate-300"),
        RuleType::Blacklist => ("Blacklist", "bg-red-500/15 text-red-300"),
    };
    let enabled = rule.status == RuleStatus::Enabled;
    let condition = rule.condition.summary();

    rsx! {
        tr { class: "border-b border-slate-900",
            td { class: "py-2 pr-4 font-medium", "{rule.name}" }
            td { class: "py-2 pr-4",
                span { class: "rounded px-2 py-0.5 text-xs {type_class}", "{type_label}" }
            }
            td { class: "py-2 pr-4",
                if enabled {
                    span { class: "text-emerald-400", "Enabled" }
                } else {
                    span { class: "text-slate-500", "Disabled" }
                }
            }
            td { class: "py-2 pr-4", "{rule.priority}" }
            td { class: "py-2 font-mono text-xs text-slate-400", "{condition}" }
        }
    }
}
