//! Public catalog queries.

use tracing::{debug, instrument};
use vetrina_client::ApiError;
pub use vetrina_core::ProductQuery;
pub use vetrina_core::types::query::{DEFAULT_PAGE_SIZE, DEFAULT_SORT};
use vetrina_core::{Page, Product, ProductCategory};

use crate::client::{CacheKey, StorefrontClient};

impl StorefrontClient {
    /// All product categories.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend cannot be reached or answers with
    /// something other than a list of category codes.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<ProductCategory>, ApiError> {
        if let Some(cached) = self.cache().get(&CacheKey::Categories).await {
            debug!("Categories served from cache");
            return Ok(cached);
        }

        let categories: Vec<ProductCategory> = self
            .api()
            .get_json("/api/public/products/categories")
            .await?;
        self.cache()
            .insert(CacheKey::Categories, categories.clone())
            .await;
        Ok(categories)
    }

    /// One page of the public catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the page does not parse.
    #[instrument(skip(self), fields(q = %query.q, page = query.page))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Page<Product>, ApiError> {
        self.api()
            .get_json_with("/api/public/products", &query.params())
            .await
    }
}
