//! Shared types for the RuiQi WAF console: wire models, list pages and the
//! backend response envelope.

pub mod error;
pub mod models;
pub mod pagination;

pub use error::*;
pub use models::*;
pub use pagination::*;
