//! List pages as returned by the console's list endpoints.

use serde::{Deserialize, Serialize};

/// One server response to a single list request.
///
/// Most endpoints answer `{ items, total }`. The log endpoints answer
/// `{ results, totalCount, currentPage, pageSize, totalPages }`; both decode
/// into this type. `total` is the server's total at fetch time and may move
/// between pages when rows are inserted or deleted concurrently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new", alias = "results")]
    pub items: Vec<T>,
    /// Missing totals decode as 0, which ends pagination.
    #[serde(default, alias = "totalCount")]
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Number of items actually carried by this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_items_and_total() {
        let page: Page<u32> = serde_json::from_str(r#"{"items":[1,2,3],"total":45}"#).unwrap();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total, 45);
    }

    #[test]
    fn decodes_log_endpoint_shape() {
        let body = r#"{
            "currentPage": 2,
            "pageSize": 10,
            "results": [7, 8],
            "totalCount": 12,
            "totalPages": 2
        }"#;
        let page: Page<u32> = serde_json::from_str(body).unwrap();
        assert_eq!(page.items, vec![7, 8]);
        assert_eq!(page.total, 12);
    }

    #[test]
    fn missing_fields_end_pagination() {
        let page: Page<u32> = serde_json::from_str("{}").unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }
}
