//! Catalog listing parameters shared by the public and admin product lists.

use super::category::ProductCategory;

/// Default page size for product listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Default product ordering.
pub const DEFAULT_SORT: &str = "name,asc";

/// Parameters of a product page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Free-text search. Blank means no filter.
    pub q: String,
    pub category: Option<ProductCategory>,
    /// 0-based page index.
    pub page: u32,
    pub size: u32,
    /// Spring-style `field,direction`.
    pub sort: String,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            q: String::new(),
            category: None,
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_SORT.to_string(),
        }
    }
}

impl ProductQuery {
    /// Query string pairs. A blank search and a missing category are
    /// omitted.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        let q = self.q.trim();
        if !q.is_empty() {
            params.push(("q", q.to_string()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.code().to_string()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("size", self.size.to_string()));
        params.push(("sort", self.sort.clone()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_omit_blank_search() {
        let query = ProductQuery {
            q: "   ".to_string(),
            ..ProductQuery::default()
        };
        let params = query.params();
        assert!(params.iter().all(|(k, _)| *k != "q" && *k != "category"));
        assert!(params.contains(&("sort", "name,asc".to_string())));
        assert!(params.contains(&("size", "10".to_string())));
    }

    #[test]
    fn test_params_trim_search_and_send_category_code() {
        let query = ProductQuery {
            q: " phone ".to_string(),
            category: Some(ProductCategory::ScannerPrinters),
            page: 2,
            ..ProductQuery::default()
        };
        let params = query.params();
        assert!(params.contains(&("q", "phone".to_string())));
        assert!(params.contains(&("category", "SCANNER_STAMPANTI".to_string())));
        assert!(params.contains(&("page", "2".to_string())));
    }
}
