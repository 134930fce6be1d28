//! Live product dashboard driven by the inventory feed.
//!
//! Every burst of `inventory-changed` events (collapsed over
//! [`REFRESH_DEBOUNCE`]) reloads the product page, the sales stats and the
//! open-alert count together.

use std::time::Duration;

use tracing::{debug, instrument, warn};
use vetrina_client::{ApiError, InventoryFeed};
use vetrina_core::{Page, Product, ProductQuery};

use crate::client::AdminClient;
use crate::products::{DEFAULT_STATS_LIMIT, SalesStats, StatsPeriod};

/// Quiet time after the last change before reloading.
pub const REFRESH_DEBOUNCE: Duration = Duration::from_millis(200);

/// What the products screen shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub products: Page<Product>,
    /// `None` when the stats could not be loaded.
    pub stats: Option<SalesStats>,
    pub open_alerts: u32,
    /// Number of feed events behind this reload; 0 for the initial load.
    pub changes: usize,
}

/// Products screen state plus the feed that keeps it fresh.
#[derive(Debug)]
pub struct LiveDashboard {
    client: AdminClient,
    feed: InventoryFeed,
    query: ProductQuery,
    stats_limit: u32,
    stats_period: StatsPeriod,
    window: Duration,
}

impl LiveDashboard {
    #[must_use]
    pub fn new(client: AdminClient, feed: InventoryFeed, query: ProductQuery) -> Self {
        Self {
            client,
            feed,
            query,
            stats_limit: DEFAULT_STATS_LIMIT,
            stats_period: StatsPeriod::All,
            window: REFRESH_DEBOUNCE,
        }
    }

    #[must_use]
    pub const fn with_stats(mut self, limit: u32, period: StatsPeriod) -> Self {
        self.stats_limit = limit;
        self.stats_period = period;
        self
    }

    #[must_use]
    pub const fn with_debounce(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub const fn query(&self) -> &ProductQuery {
        &self.query
    }

    /// Period the stats will be requested for. Switches to
    /// [`StatsPeriod::All`] after a fallback.
    #[must_use]
    pub const fn stats_period(&self) -> StatsPeriod {
        self.stats_period
    }

    /// Load everything once.
    ///
    /// Stats and alert-count failures are logged and do not fail the load.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the product page cannot be loaded.
    #[instrument(skip(self), fields(page = self.query.page))]
    pub async fn load(&mut self) -> Result<Dashboard, ApiError> {
        self.reload(0).await
    }

    /// Wait for the next burst of stock changes, then reload.
    ///
    /// Returns `None` once the feed has shut down.
    pub async fn next(&mut self) -> Option<Result<Dashboard, ApiError>> {
        let batch = self.feed.next_debounced(self.window).await?;
        debug!(events = batch.len(), "Inventory changed; reloading dashboard");
        Some(self.reload(batch.len()).await)
    }

    async fn reload(&mut self, changes: usize) -> Result<Dashboard, ApiError> {
        let (products, stats, count) = tokio::join!(
            self.client.products(&self.query),
            self.client.sales_stats(self.stats_limit, self.stats_period),
            self.client.refresh_alert_count(),
        );

        let stats = match stats {
            Ok(stats) => {
                self.stats_period = stats.period;
                Some(stats)
            }
            Err(e) => {
                warn!(error = %e, "Stats reload failed");
                None
            }
        };
        if let Err(e) = count {
            warn!(error = %e, "Alert count reload failed");
        }

        Ok(Dashboard {
            products: products?,
            stats,
            open_alerts: self.client.badge().get(),
            changes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use vetrina_client::{ApiClient, ClientConfig, SessionAction};
    use vetrina_core::Role;

    fn admin(server: &MockServer) -> AdminClient {
        let config = ClientConfig::for_url(&server.base_url()).unwrap();
        let api = ApiClient::new(&config).unwrap();
        api.session().dispatch(SessionAction::SignedIn {
            token: "admin-token".to_string().into(),
            role: Role::Admin,
        });
        AdminClient::new(api)
    }

    async fn mock_backend(server: &MockServer, events: &str) {
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/products");
                then.status(200).json_body(json!({
                    "content": [{
                        "productId": 1, "name": "Case", "price": 9.5,
                        "quantity": 2, "category": "ACCESSORI"
                    }],
                    "number": 0, "size": 10, "totalElements": 1, "totalPages": 1,
                    "first": true, "last": true
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/products/stats/top-selling");
                then.status(200).json_body(json!([]));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/products/stats/least-selling");
                then.status(500);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/alerts/open/count");
                then.status(200).json_body(json!(2));
            })
            .await;
        let body = events.to_string();
        server
            .mock_async(move |when, then| {
                when.method(GET).path("/api/public/events/updates");
                then.status(200)
                    .header("content-type", "text/event-stream")
                    .body(body);
            })
            .await;
    }

    #[tokio::test]
    async fn test_load_tolerates_stats_failure() {
        let server = MockServer::start_async().await;
        mock_backend(&server, "event: connected\ndata: {}\n\n").await;

        let client = admin(&server);
        let feed = InventoryFeed::connect_with_retry(client.api(), Duration::from_secs(60)).unwrap();
        let mut live = LiveDashboard::new(client, feed, ProductQuery::default());

        let dashboard = live.load().await.unwrap();
        assert_eq!(dashboard.products.content.len(), 1);
        assert!(dashboard.stats.is_none());
        assert_eq!(dashboard.open_alerts, 2);
        assert_eq!(dashboard.changes, 0);
    }

    #[tokio::test]
    async fn test_burst_triggers_one_reload() {
        let server = MockServer::start_async().await;
        mock_backend(
            &server,
            "event: connected\ndata: {\"ok\":true}\n\n\
             event: inventory-changed\ndata: {\"type\":\"STOCK\",\"reason\":\"ORDER\"}\n\n\
             event: inventory-changed\ndata: {\"type\":\"STOCK\",\"reason\":\"RESTOCK\"}\n\n",
        )
        .await;

        let client = admin(&server);
        let feed = InventoryFeed::connect_with_retry(client.api(), Duration::from_secs(60)).unwrap();
        let mut live = LiveDashboard::new(client, feed, ProductQuery::default())
            .with_debounce(Duration::from_millis(100));

        let dashboard = tokio::time::timeout(Duration::from_secs(5), live.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(dashboard.changes, 2);
        assert_eq!(dashboard.products.content[0].stock(), 2);
    }
}
