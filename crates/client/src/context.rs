//! Console-wide context: configuration and the API client built from it.

use dioxus::prelude::*;

use crate::api_client::ApiClient;
use crate::config::ConsoleConfig;
use crate::infinite::WatcherOptions;
use crate::log_error;

#[derive(Clone, Copy)]
pub struct ConsoleContext {
    pub config: Signal<ConsoleConfig>,
}

impl ConsoleContext {
    /// Create an API client for the current configuration.
    pub fn client(&self) -> ApiClient {
        let config = self.config.read();
        ApiClient::from_config(&config).unwrap_or_else(|e| {
            log_error!("Falling back to a default HTTP client: {}", e);
            ApiClient::new()
                .with_base_url(config.api_base_url.clone())
                .with_token(config.api_token.clone())
        })
    }

    pub fn page_size(&self) -> u32 {
        self.config.read().page_size
    }

    pub fn watcher_options(&self) -> WatcherOptions {
        self.config.read().watcher
    }
}

/// Makes [`ConsoleContext`] available to `children`.
#[component]
pub fn ConsoleProvider(config: ConsoleConfig, children: Element) -> Element {
    let config = use_signal(|| config);
    use_context_provider(|| ConsoleContext { config });
    children
}

pub fn use_console() -> ConsoleContext {
    use_context::<ConsoleContext>()
}
