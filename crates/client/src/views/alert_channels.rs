use dioxus::prelude::*;
use ruiqi_shared::AlertChannelType;

use crate::components::{ListFooter, ScrollSentinel};
use crate::context::use_console;
use crate::hooks::use_infinite_list;
use crate::infinite::{fetch_fn, QueryKey};

fn type_label(channel_type: AlertChannelType) -> &'static str {
    match channel_type {
        AlertChannelType::Webhook => "Webhook",
        AlertChannelType::Feishu => "Feishu",
        AlertChannelType::Dingtalk => "DingTalk",
        AlertChannelType::Wechat => "WeChat Work",
        AlertChannelType::Email => "Email",
    }
}

#[component]
pub fn AlertChannels() -> Element {
    let ctx = use_console();
    let list = use_infinite_list(
        || QueryKey::new("alert-channels"),
        ctx.page_size(),
        move || {
            fetch_fn(move |page, size| {
                let client = ctx.client();
                async move { client.list_alert_channels(page, size).await }
            })
        },
    );
    let state = list.snapshot();

    rsx! {
        div { class: "mx-auto max-w-4xl",
            h1 { class: "mb-6 text-2xl font-semibold", "Alert Channels" }
            ul { class: "divide-y divide-slate-800 rounded-lg border border-slate-800",
                for channel in state.items.iter() {
                    li { key: "{channel.id}", class: "flex items-center justify-between p-4",
                        div {
                            p { class: "font-medium", "{channel.name}" }
                            p { class: "text-xs text-slate-500", {type_label(channel.channel_type)} }
                        }
                        if channel.enabled {
                            span { class: "text-xs text-emerald-400", "Enabled" }
                        } else {
                            span { class: "text-xs text-slate-500", "Disabled" }
                        }
                    }
                }
            }
            ScrollSentinel {
                id: "alert-channels-sentinel",
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
