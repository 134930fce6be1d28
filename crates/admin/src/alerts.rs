//! Low-stock alerts and the open-alert badge.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use vetrina_client::ApiError;
use vetrina_core::{AlertId, StockAlert};

use crate::client::AdminClient;

/// How often the side-menu badge re-reads the open-alert count.
pub const BADGE_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// How often the alerts board reloads its list.
pub const BOARD_POLL_INTERVAL: Duration = Duration::from_secs(15);

// =============================================================================
// AlertBadge
// =============================================================================

/// Process-wide open-alert counter. Never negative.
#[derive(Clone)]
pub struct AlertBadge {
    sender: Arc<watch::Sender<u32>>,
}

impl std::fmt::Debug for AlertBadge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AlertBadge").field(&self.get()).finish()
    }
}

impl Default for AlertBadge {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertBadge {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            sender: Arc::new(sender),
        }
    }

    #[must_use]
    pub fn get(&self) -> u32 {
        *self.sender.borrow()
    }

    /// Store `count`, clamped to `0..=u32::MAX`. Subscribers are notified
    /// only when the value changes.
    pub fn set(&self, count: i64) {
        let count = u32::try_from(count.max(0)).unwrap_or(u32::MAX);
        self.sender.send_if_modified(|current| {
            if *current == count {
                false
            } else {
                *current = count;
                true
            }
        });
    }

    /// Receiver that observes every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.sender.subscribe()
    }
}

// =============================================================================
// Endpoints
// =============================================================================

impl AdminClient {
    /// Open alerts. The badge is set to the number returned.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn open_alerts(&self) -> Result<Vec<StockAlert>, ApiError> {
        let alerts: Vec<StockAlert> = self.api().get_json("/api/admin/alerts").await?;
        self.badge()
            .set(i64::try_from(alerts.len()).unwrap_or(i64::MAX));
        Ok(alerts)
    }

    /// Number of open alerts, also stored in the badge.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails; the badge keeps its value.
    #[instrument(skip(self))]
    pub async fn refresh_alert_count(&self) -> Result<u32, ApiError> {
        let count: i64 = self.api().get_json("/api/admin/alerts/open/count").await?;
        self.badge().set(count);
        debug!(count, "Open alert count refreshed");
        Ok(self.badge().get())
    }

    /// Acknowledge an alert, then reload the open list (and so the badge).
    ///
    /// Returns the acknowledged alert and the reloaded list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the acknowledgement or the reload fails.
    #[instrument(skip(self))]
    pub async fn ack_alert(&self, id: AlertId) -> Result<(StockAlert, Vec<StockAlert>), ApiError> {
        let acked: StockAlert = self
            .api()
            .post_json(&format!("/api/admin/alerts/{id}/ack"), &json!({}))
            .await?;
        info!(alert_id = %id, product = %acked.product_name, "Alert acknowledged");
        let open = self.open_alerts().await?;
        Ok((acked, open))
    }

    /// Keep the badge current by polling the count endpoint. Failures are
    /// logged and skipped.
    #[must_use]
    pub fn poll_badge(&self, every: Duration) -> Poller {
        let client = self.clone();
        Poller::spawn(every, move || {
            let client = client.clone();
            async move {
                if let Err(e) = client.refresh_alert_count().await {
                    debug!(error = %e, "Badge refresh failed");
                }
            }
        })
    }

    /// Reload the open alert list on a timer and publish each successful
    /// result. The receiver starts empty.
    #[must_use]
    pub fn poll_alerts(&self, every: Duration) -> (Poller, watch::Receiver<Vec<StockAlert>>) {
        let (sender, receiver) = watch::channel(Vec::new());
        let sender = Arc::new(sender);
        let client = self.clone();
        let poller = Poller::spawn(every, move || {
            let client = client.clone();
            let sender = Arc::clone(&sender);
            async move {
                match client.open_alerts().await {
                    Ok(alerts) => {
                        sender.send_replace(alerts);
                    }
                    Err(e) => warn!(error = %e, "Alert board reload failed"),
                }
            }
        });
        (poller, receiver)
    }
}

// =============================================================================
// Poller
// =============================================================================

/// A background task that runs a job immediately and then on a fixed
/// interval. Dropping the handle stops it.
#[derive(Debug)]
pub struct Poller {
    task: JoinHandle<()>,
}

impl Poller {
    /// Start polling. Must be called inside a Tokio runtime.
    pub fn spawn<F, Fut>(every: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                job().await;
            }
        });
        Self { task }
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
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

    fn alert_json(id: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id, "productId": 3, "productName": "Phone X",
            "currentQuantity": 1, "threshold": 2, "status": status,
            "createdAt": "2025-05-01T08:00:00"
        })
    }

    #[test]
    fn test_badge_never_negative() {
        let badge = AlertBadge::new();
        badge.set(-4);
        assert_eq!(badge.get(), 0);
        badge.set(7);
        assert_eq!(badge.get(), 7);
    }

    #[tokio::test]
    async fn test_badge_notifies_on_change_only() {
        let badge = AlertBadge::new();
        let mut rx = badge.subscribe();
        badge.set(3);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 3);
        badge.set(3);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_open_alerts_sets_badge() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/admin/alerts")
                    .header("authorization", "Bearer admin-token");
                then.status(200)
                    .json_body(json!([alert_json(1, "OPEN"), alert_json(2, "OPEN")]));
            })
            .await;

        let client = admin(&server);
        let alerts = client.open_alerts().await.unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(client.badge().get(), 2);
    }

    #[tokio::test]
    async fn test_refresh_alert_count() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/alerts/open/count");
                then.status(200).json_body(json!(5));
            })
            .await;

        let client = admin(&server);
        assert_eq!(client.refresh_alert_count().await.unwrap(), 5);
        assert_eq!(client.badge().get(), 5);
    }

    #[tokio::test]
    async fn test_ack_reloads_list() {
        let server = MockServer::start_async().await;
        let ack = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/admin/alerts/1/ack");
                then.status(200).json_body(alert_json(1, "ACK"));
            })
            .await;
        let list = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/alerts");
                then.status(200).json_body(json!([alert_json(2, "OPEN")]));
            })
            .await;

        let client = admin(&server);
        client.badge().set(2);
        let (acked, open) = client.ack_alert(AlertId::new(1)).await.unwrap();

        ack.assert_async().await;
        list.assert_async().await;
        assert!(!acked.is_open());
        assert_eq!(open.len(), 1);
        assert_eq!(client.badge().get(), 1);
    }

    #[tokio::test]
    async fn test_forbidden_for_user_role() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/alerts");
                then.status(403);
            })
            .await;

        let client = admin(&server);
        let err = client.open_alerts().await.unwrap_err();
        assert_eq!(err.user_message("Failed to load alerts"), "ADMIN required");
        assert!(client.api().session().snapshot().is_logged_in());
    }

    #[tokio::test]
    async fn test_board_poller_publishes_list_and_badge() {
        let server = MockServer::start_async().await;
        let list = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/alerts");
                then.status(200)
                    .json_body(json!([alert_json(1, "OPEN"), alert_json(2, "OPEN")]));
            })
            .await;

        let client = admin(&server);
        let (poller, mut board) = client.poll_alerts(Duration::from_secs(3600));
        assert!(board.borrow().is_empty());

        tokio::time::timeout(Duration::from_secs(5), board.changed())
            .await
            .unwrap()
            .unwrap();
        let alerts = board.borrow_and_update().clone();
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(StockAlert::is_open));
        assert_eq!(client.badge().get(), 2);
        poller.stop();
        list.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_badge_poller_runs_immediately() {
        let server = MockServer::start_async().await;
        let count = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/admin/alerts/open/count");
                then.status(200).json_body(json!(4));
            })
            .await;

        let client = admin(&server);
        let mut rx = client.badge().subscribe();
        let poller = client.poll_badge(Duration::from_secs(3600));

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(client.badge().get(), 4);
        poller.stop();
        count.assert_hits_async(1).await;
    }
}
