//! Paginated responses.

use serde::{Deserialize, Serialize};

/// One page of a server-side paginated listing (0-based page index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
}

impl<T> Page<T> {
    /// An empty first page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            content: Vec::new(),
            number: 0,
            size: 0,
            total_elements: 0,
            total_pages: 0,
            first: true,
            last: true,
        }
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.number > 0
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.total_pages > 0 && self.number + 1 < self.total_pages
    }

    /// 1-based page number for display (`0` when there are no pages).
    #[must_use]
    pub const fn display_number(&self) -> u32 {
        if self.total_pages == 0 { 0 } else { self.number + 1 }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_navigation() {
        let page: Page<u32> = Page {
            content: vec![1, 2],
            number: 1,
            size: 2,
            total_elements: 6,
            total_pages: 3,
            first: false,
            last: false,
        };
        assert!(page.has_prev());
        assert!(page.has_next());
        assert_eq!(page.display_number(), 2);
    }

    #[test]
    fn test_empty_page() {
        let page: Page<u32> = Page::empty();
        assert!(!page.has_prev());
        assert!(!page.has_next());
        assert_eq!(page.display_number(), 0);
    }

    #[test]
    fn test_page_tolerates_missing_fields() {
        let page: Page<u32> = serde_json::from_str(r#"{"content":[5],"totalPages":1}"#)
            .expect("lenient page");
        assert_eq!(page.content, vec![5]);
        assert_eq!(page.number, 0);
        assert!(!page.has_next());
    }
}
