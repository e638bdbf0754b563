//! Reusable components.

pub mod list;
pub mod ui;

pub use list::{ListFooter, ScrollSentinel};
