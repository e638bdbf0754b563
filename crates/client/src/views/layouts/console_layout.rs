//! Console shell with the navigation sidebar.

use crate::components::list::SCROLL_ROOT_ID;
use crate::Route;
use dioxus::prelude::*;

fn nav_items() -> [(&'static str, Route); 6] {
    [
        ("Sites", Route::Sites {}),
        ("Certificates", Route::Certificates {}),
        ("IP Groups", Route::IpGroups {}),
        ("Micro Rules", Route::MicroRules {}),
        ("Attack Events", Route::AttackEvents {}),
        ("Alert Channels", Route::AlertChannels {}),
    ]
}

#[component]
pub fn ConsoleLayout() -> Element {
    let route = use_route::<Route>();

    rsx! {
        div { class: "flex h-screen bg-slate-950 text-slate-100",
            nav { class: "flex w-56 shrink-0 flex-col gap-1 border-r border-slate-800 bg-slate-900 p-3",
                div { class: "mb-4 px-2 text-lg font-semibold tracking-wide", "RuiQi WAF" }
                for (label, target) in nav_items() {
                    {
                        let class = if target == route {
                            "rounded-md bg-slate-800 px-3 py-2 text-sm font-medium text-white"
                        } else {
                            "rounded-md px-3 py-2 text-sm text-slate-400 hover:bg-slate-800 hover:text-white"
                        };
                        rsx! {
                            Link { key: "{label}", to: target, class: "{class}", "{label}" }
                        }
                    }
                }
            }
            main { id: SCROLL_ROOT_ID, class: "flex-1 overflow-y-auto p-6",
                Outlet::<Route> {}
            }
        }
    }
}

/// Shown for paths no route matches.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div { class: "flex flex-col items-center justify-center gap-4 py-24 text-slate-400",
            h2 { class: "text-xl font-semibold text-white", "Page not found" }
            p { "/{path}" }
            Link { to: Route::Sites {}, class: "text-emerald-400 hover:underline", "Back to sites" }
        }
    }
}
