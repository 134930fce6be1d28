use std::sync::Arc;

use vetrina_client::ApiClient;

use crate::alerts::AlertBadge;

// =============================================================================
// AdminClient
// =============================================================================

/// Client for the `/api/admin/*` endpoints.
///
/// Every call needs an `ADMIN` session: the backend answers 401 without a
/// token (which also signs the shared session out) and 403 for a `USER`.
/// Clones share the [`AlertBadge`].
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    api: ApiClient,
    badge: AlertBadge,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("api", &self.inner.api)
            .field("open_alerts", &self.inner.badge.get())
            .finish()
    }
}

impl AdminClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                api,
                badge: AlertBadge::new(),
            }),
        }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Open-alert counter kept current by the alert calls.
    #[must_use]
    pub fn badge(&self) -> &AlertBadge {
        &self.inner.badge
    }
}
