//! Console configuration from environment variables.
//!
//! Desktop builds read the process environment at startup. Web builds have
//! no process environment, so the same variables are captured at compile time.

use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::infinite::WatcherOptions;

pub const DEFAULT_API_BASE_URL: &str = "/api/v1";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page the backend list endpoints accept.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Prefix for every API path, absolute URL or path on the serving origin.
    pub api_base_url: String,
    pub api_timeout: Duration,
    /// Page size for infinite lists.
    pub page_size: u32,
    pub api_token: Option<String>,
    pub watcher: WatcherOptions,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: Duration::from_millis(DEFAULT_API_TIMEOUT_MS),
            page_size: DEFAULT_PAGE_SIZE,
            api_token: None,
            watcher: WatcherOptions::default(),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from the environment.
    ///
    /// Environment variables:
    /// - `RUIQI_API_BASE_URL`: API prefix (default: "/api/v1")
    /// - `RUIQI_API_TIMEOUT`: request timeout in milliseconds (default: 10000)
    /// - `RUIQI_PAGE_SIZE`: infinite list page size, clamped to 1..=100 (default: 20)
    /// - `RUIQI_API_TOKEN`: bearer token sent with every request (default: none)
    /// - `RUIQI_SCROLL_THRESHOLD`: visible fraction of the sentinel that triggers a load (default: 0.1)
    /// - `RUIQI_SCROLL_MARGIN`: lookahead distance in pixels (default: 100)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(base) = value("RUIQI_API_BASE_URL") {
            config.api_base_url = validate_base_url(base.trim())?;
        }

        if let Some(raw) = value("RUIQI_API_TIMEOUT") {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("RUIQI_API_TIMEOUT is not a number of milliseconds: {raw:?}"))?;
            if ms == 0 {
                bail!("RUIQI_API_TIMEOUT must be greater than zero");
            }
            config.api_timeout = Duration::from_millis(ms);
        }

        if let Some(raw) = value("RUIQI_PAGE_SIZE") {
            let size: u32 = raw
                .trim()
                .parse()
                .with_context(|| format!("RUIQI_PAGE_SIZE is not a positive integer: {raw:?}"))?;
            config.page_size = size.clamp(1, MAX_PAGE_SIZE);
        }

        config.api_token = value("RUIQI_API_TOKEN").map(|t| t.trim().to_string());

        if let Some(raw) = value("RUIQI_SCROLL_THRESHOLD") {
            let threshold: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("RUIQI_SCROLL_THRESHOLD is not a number: {raw:?}"))?;
            if !(0.0..=1.0).contains(&threshold) {
                bail!("RUIQI_SCROLL_THRESHOLD must be within 0.0..=1.0, got {threshold}");
            }
            config.watcher.threshold = threshold;
        }

        if let Some(raw) = value("RUIQI_SCROLL_MARGIN") {
            let margin: f64 = raw
                .trim()
                .parse()
                .with_context(|| format!("RUIQI_SCROLL_MARGIN is not a number of pixels: {raw:?}"))?;
            if margin < 0.0 || !margin.is_finite() {
                bail!("RUIQI_SCROLL_MARGIN must be a non-negative number, got {margin}");
            }
            config.watcher.lookahead_margin = margin;
        }

        Ok(config)
    }
}

fn validate_base_url(base: &str) -> Result<String> {
    if base.starts_with("http://") || base.starts_with("https://") {
        let parsed = url::Url::parse(base).with_context(|| format!("invalid RUIQI_API_BASE_URL: {base}"))?;
        return Ok(parsed.as_str().trim_end_matches('/').to_string());
    }
    if !base.starts_with('/') {
        bail!("RUIQI_API_BASE_URL must be an absolute URL or start with '/': {base}");
    }
    Ok(base.trim_end_matches('/').to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(target_arch = "wasm32")]
fn env_var(name: &str) -> Option<String> {
    let value = match name {
        "RUIQI_API_BASE_URL" => option_env!("RUIQI_API_BASE_URL"),
        "RUIQI_API_TIMEOUT" => option_env!("RUIQI_API_TIMEOUT"),
        "RUIQI_PAGE_SIZE" => option_env!("RUIQI_PAGE_SIZE"),
        "RUIQI_API_TOKEN" => option_env!("RUIQI_API_TOKEN"),
        "RUIQI_SCROLL_THRESHOLD" => option_env!("RUIQI_SCROLL_THRESHOLD"),
        "RUIQI_SCROLL_MARGIN" => option_env!("RUIQI_SCROLL_MARGIN"),
        _ => None,
    };
    value.map(str::to_string)
}
