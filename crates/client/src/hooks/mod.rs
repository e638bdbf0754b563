mod infinite_list;

pub use infinite_list::{use_infinite_list, InfiniteList};
