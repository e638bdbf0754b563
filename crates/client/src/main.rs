//! RuiQi WAF console - main entry point
//!
//! Supports both web (WASM) and desktop platforms.

#![allow(non_snake_case)]

use dioxus::prelude::*;
use ruiqi_console::{log_error, log_info, ConsoleConfig, ConsoleProvider, Route};

fn main() {
    ruiqi_console::logging::init("ruiqi_console=debug");
    dioxus::launch(App);
}

fn load_config() -> ConsoleConfig {
    match ConsoleConfig::from_env() {
        Ok(config) => {
            log_info!(
                "API at {} (page size {})",
                config.api_base_url,
                config.page_size
            );
            config
        }
        Err(e) => {
            log_error!("Invalid configuration, using defaults: {:#}", e);
            ConsoleConfig::default()
        }
    }
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        ConsoleProvider { config,
            Router::<Route> {}
        }
    }
}
