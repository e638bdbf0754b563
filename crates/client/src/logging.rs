//! Cross-platform logging.
//!
//! The `log_*!` macros format their arguments and hand them to [`emit`],
//! which dispatches to the platform backend:
//! - Web: `web_sys::console`
//! - Desktop: `tracing`, configured by [`init`]

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Install the native tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. A second call is ignored.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init(_default_filter: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn emit(level: LogLevel, msg: &str) {
    match level {
        LogLevel::Debug => tracing::debug!(target: "ruiqi_console", "{}", msg),
        LogLevel::Info => tracing::info!(target: "ruiqi_console", "{}", msg),
        LogLevel::Warn => tracing::warn!(target: "ruiqi_console", "{}", msg),
        LogLevel::Error => tracing::error!(target: "ruiqi_console", "{}", msg),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn emit(level: LogLevel, msg: &str) {
    let value = wasm_bindgen::JsValue::from_str(msg);
    match level {
        LogLevel::Debug => web_sys::console::debug_1(&value),
        LogLevel::Info => web_sys::console::log_1(&value),
        LogLevel::Warn => web_sys::console::warn_1(&value),
        LogLevel::Error => web_sys::console::error_1(&value),
    }
}

/// Log a debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::LogLevel::Debug, &format!($($arg)*))
    };
}

/// Log an info message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::LogLevel::Info, &format!($($arg)*))
    };
}

/// Log a warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::LogLevel::Warn, &format!($($arg)*))
    };
}

/// Log an error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logging::emit($crate::logging::LogLevel::Error, &format!($($arg)*))
    };
}
