use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use vetrina_client::ApiClient;
use vetrina_core::ProductCategory;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Cache key for rarely-changing catalog data.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub(crate) enum CacheKey {
    Categories,
}

/// Client for the shopper-facing endpoints.
///
/// Shares the [`ApiClient`] (and so the session) it was built from.
/// Categories are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    api: ApiClient,
    cache: Cache<CacheKey, Vec<ProductCategory>>,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("api", &self.inner.api)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a storefront client on top of an API client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner { api, cache }),
        }
    }

    /// Underlying API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub(crate) fn cache(&self) -> &Cache<CacheKey, Vec<ProductCategory>> {
        &self.inner.cache
    }
}
