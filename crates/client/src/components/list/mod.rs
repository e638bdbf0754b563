//! Building blocks for incrementally loaded lists.

/// Id of the element that scrolls list content; sentinels observe against it.
pub const SCROLL_ROOT_ID: &str = "console-main";

mod footer;
mod sentinel;

pub use footer::{ListFooter, ListFooterProps};
pub use sentinel::{ScrollSentinel, ScrollSentinelProps};
