//! RuiQi WAF console
//!
//! Dioxus web/desktop client for the WAF management API. The list views are
//! built on [`infinite`], which loads paginated collections page by page as
//! the user scrolls.

pub mod api_client;
pub mod config;
pub mod context;
pub mod infinite;
pub mod logging;

pub mod components;
pub mod hooks;
pub mod routes;
pub mod views;

pub use api_client::ApiClient;
pub use config::ConsoleConfig;
pub use context::{ConsoleContext, ConsoleProvider};
pub use routes::Route;
