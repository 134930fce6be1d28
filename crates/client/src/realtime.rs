//! Server-push inventory feed.
//!
//! The backend publishes Server-Sent Events on
//! `{base}/api/public/events/updates`:
//!
//! - `connected` - sent once when the stream opens
//! - `inventory-changed` - `{"type": ..., "reason": ..., "at": ...}` after any
//!   stock-affecting change (order placed, restock, product edited)
//!
//! [`InventoryFeed`] owns a background task that reads the stream, reconnects
//! after a pause when it drops, and forwards events over a channel. Dropping
//! the feed aborts the task.

use std::time::Duration;

use async_stream::stream;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::api::ApiClient;
use crate::error::ApiError;

/// Pause before reconnecting after the stream ends or fails.
pub const DEFAULT_RETRY: Duration = Duration::from_secs(3);

const CHANNEL_CAPACITY: usize = 64;
const EVENTS_PATH: &str = "api/public/events/updates";

/// Payload of an `inventory-changed` event. Every field is optional on the
/// wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEvent {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub at: Option<String>,
}

impl InventoryEvent {
    /// Stand-in for an event whose data could not be parsed.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            reason: Some("UNKNOWN".to_string()),
            ..Self::default()
        }
    }
}

/// An event received from the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The stream opened. Carries the backend's greeting, if it parsed.
    Connected(serde_json::Value),
    /// Stock changed somewhere; refetch what is on screen.
    InventoryChanged(InventoryEvent),
}

/// URL of the event stream for an API base URL.
///
/// A trailing `/` and a trailing `/api` are removed from the base first, so
/// both `http://host:8080` and `http://host:8080/api/` map to
/// `http://host:8080/api/public/events/updates`.
///
/// # Errors
///
/// Returns `url::ParseError` if the resulting URL is malformed.
pub fn events_url(base: &Url) -> Result<Url, url::ParseError> {
    let raw = base.as_str().trim();
    let without_slash = raw.strip_suffix('/').unwrap_or(raw);
    let root = without_slash.strip_suffix("/api").unwrap_or(without_slash);
    Url::parse(&format!("{root}/{EVENTS_PATH}"))
}

// =============================================================================
// InventoryFeed
// =============================================================================

/// A live subscription to inventory events. Dropping it disconnects.
#[derive(Debug)]
pub struct InventoryFeed {
    receiver: mpsc::Receiver<FeedEvent>,
    task: JoinHandle<()>,
}

impl Drop for InventoryFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl InventoryFeed {
    /// Subscribe with the default reconnect pause.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the stream URL cannot be built.
    pub fn connect(api: &ApiClient) -> Result<Self, ApiError> {
        Self::connect_with_retry(api, DEFAULT_RETRY)
    }

    /// Subscribe, waiting `retry` between reconnect attempts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the stream URL cannot be built.
    pub fn connect_with_retry(api: &ApiClient, retry: Duration) -> Result<Self, ApiError> {
        let url = events_url(api.base_url())?;
        let client = api.stream_client().clone();
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);

        let task = tokio::spawn(run_feed(client, url, sender, retry));

        Ok(Self { receiver, task })
    }

    /// Next event, or `None` once the feed has shut down.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        self.receiver.recv().await
    }

    /// Next `inventory-changed` event, skipping everything else.
    pub async fn next_change(&mut self) -> Option<InventoryEvent> {
        loop {
            match self.next().await? {
                FeedEvent::InventoryChanged(event) => return Some(event),
                FeedEvent::Connected(_) => {}
            }
        }
    }

    /// Wait for a change, then keep collecting until `window` passes without
    /// another one. A burst of events yields a single batch.
    pub async fn next_debounced(&mut self, window: Duration) -> Option<Vec<InventoryEvent>> {
        let mut batch = vec![self.next_change().await?];
        loop {
            match tokio::time::timeout(window, self.next_change()).await {
                Ok(Some(event)) => batch.push(event),
                Ok(None) | Err(_) => return Some(batch),
            }
        }
    }
}

#[instrument(skip(client, sender), fields(url = %url))]
async fn run_feed(
    client: reqwest::Client,
    url: Url,
    sender: mpsc::Sender<FeedEvent>,
    retry: Duration,
) {
    loop {
        match open_stream(&client, url.clone()).await {
            Ok(events) => {
                debug!("Inventory feed connected");
                let mut events = std::pin::pin!(events);
                while let Some(item) = events.next().await {
                    match item {
                        Ok(event) => {
                            if sender.send(event).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "Inventory feed interrupted");
                            break;
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "Inventory feed connection failed"),
        }

        if sender.is_closed() {
            return;
        }
        tokio::time::sleep(retry).await;
    }
}

async fn open_stream(
    client: &reqwest::Client,
    url: Url,
) -> Result<impl Stream<Item = Result<FeedEvent, ApiError>>, ApiError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status,
            message: None,
        });
    }

    Ok(stream! {
        let mut pending: Vec<u8> = Vec::new();
        let mut buffer = String::new();
        let mut byte_stream = std::pin::pin!(response.bytes_stream());

        while let Some(chunk_result) = byte_stream.next().await {
            match chunk_result {
                Ok(chunk) => {
                    pending.extend_from_slice(&chunk);
                    buffer.push_str(&take_utf8(&mut pending));

                    // Process complete SSE events
                    while let Some(event) = extract_sse_event(&mut buffer) {
                        if let Some(parsed) = parse_sse_event(&event) {
                            yield Ok(parsed);
                        }
                    }
                }
                Err(e) => {
                    yield Err(ApiError::Http(e));
                    return;
                }
            }
        }
    })
}

/// Move the longest valid UTF-8 prefix out of `pending`, leaving a split
/// multi-byte sequence behind for the next chunk.
fn take_utf8(pending: &mut Vec<u8>) -> String {
    let valid = match std::str::from_utf8(pending) {
        Ok(_) => pending.len(),
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        // Genuinely invalid bytes: decode lossily rather than stall.
        Err(_) => pending.len(),
    };
    let rest = pending.split_off(valid);
    let text = String::from_utf8_lossy(pending).into_owned();
    *pending = rest;
    text
}

/// Extract the next complete event from the buffer.
fn extract_sse_event(buffer: &mut String) -> Option<String> {
    // A trailing `\r` may be the first half of a `\r\n` still in flight.
    let held_cr = buffer.ends_with('\r');
    if held_cr {
        buffer.pop();
    }
    if buffer.contains('\r') {
        *buffer = buffer.replace("\r\n", "\n").replace('\r', "\n");
    }
    // SSE events are separated by a blank line
    let event = buffer.find("\n\n").map(|idx| {
        let event = buffer[..idx].to_string();
        buffer.drain(..idx + 2);
        event
    });
    if held_cr {
        buffer.push('\r');
    }
    event
}

/// Parse one SSE block. Unnamed events and unknown names are ignored.
fn parse_sse_event(event: &str) -> Option<FeedEvent> {
    if event.trim().is_empty() {
        return None;
    }

    let mut name = "message";
    let mut data_lines: Vec<&str> = Vec::new();

    for line in event.lines() {
        if line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => name = value,
            "data" => data_lines.push(value),
            _ => {}
        }
    }

    let data = data_lines.join("\n");
    let data = if data.trim().is_empty() { "{}" } else { data.as_str() };

    match name {
        "connected" => Some(FeedEvent::Connected(
            serde_json::from_str(data).unwrap_or_else(|_| serde_json::json!({ "ok": true })),
        )),
        "inventory-changed" => Some(FeedEvent::InventoryChanged(
            serde_json::from_str(data).unwrap_or_else(|_| InventoryEvent::unknown()),
        )),
        other => {
            debug!(event = other, "Ignoring unrecognised feed event");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use httpmock::prelude::*;

    #[test]
    fn test_events_url_strips_api_suffix() {
        let cases = [
            ("http://localhost:8080", "http://localhost:8080/api/public/events/updates"),
            ("http://localhost:8080/", "http://localhost:8080/api/public/events/updates"),
            ("http://localhost:8080/api", "http://localhost:8080/api/public/events/updates"),
            ("https://shop.example.com/api/", "https://shop.example.com/api/public/events/updates"),
            ("https://example.com/shop", "https://example.com/shop/api/public/events/updates"),
        ];
        for (base, expected) in cases {
            let url = events_url(&Url::parse(base).unwrap()).unwrap();
            assert_eq!(url.as_str(), expected, "base {base}");
        }
    }

    #[test]
    fn test_extract_sse_event() {
        let mut buffer = "event: connected\ndata: {}\n\nevent: inventory-changed\ndata: {}\n\n".to_string();

        let first = extract_sse_event(&mut buffer).unwrap();
        assert_eq!(first, "event: connected\ndata: {}");
        let second = extract_sse_event(&mut buffer).unwrap();
        assert!(second.starts_with("event: inventory-changed"));
        assert!(extract_sse_event(&mut buffer).is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_extract_sse_event_handles_crlf() {
        let mut buffer = "event: connected\r\ndata: {}\r\n\r\nrest".to_string();
        assert_eq!(
            extract_sse_event(&mut buffer).as_deref(),
            Some("event: connected\ndata: {}")
        );
        assert_eq!(buffer, "rest");
    }

    #[test]
    fn test_extract_sse_event_crlf_split_across_chunks() {
        let mut buffer = String::new();
        let mut events = Vec::new();
        for chunk in [
            "event: inventory-changed\r",
            "\ndata: {\"reason\":\"RESTOCK\"}\r\n\r\n",
        ] {
            buffer.push_str(chunk);
            while let Some(event) = extract_sse_event(&mut buffer) {
                events.extend(parse_sse_event(&event));
            }
        }

        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[..],
            [FeedEvent::InventoryChanged(change)] if change.reason.as_deref() == Some("RESTOCK")
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_parse_inventory_changed() {
        let event = parse_sse_event(
            "event: inventory-changed\ndata: {\"type\":\"INVENTORY_CHANGED\",\"reason\":\"ORDER_CREATED\",\"at\":\"2025-05-01T10:00:00\"}",
        );
        assert_eq!(
            event,
            Some(FeedEvent::InventoryChanged(InventoryEvent {
                kind: Some("INVENTORY_CHANGED".to_string()),
                reason: Some("ORDER_CREATED".to_string()),
                at: Some("2025-05-01T10:00:00".to_string()),
            }))
        );
    }

    #[test]
    fn test_parse_unparseable_data_is_unknown() {
        let event = parse_sse_event("event: inventory-changed\ndata: not-json");
        assert_eq!(event, Some(FeedEvent::InventoryChanged(InventoryEvent::unknown())));
    }

    #[test]
    fn test_parse_empty_data_and_other_events() {
        assert_eq!(
            parse_sse_event("event: inventory-changed"),
            Some(FeedEvent::InventoryChanged(InventoryEvent::default()))
        );
        assert_eq!(
            parse_sse_event("event: connected\ndata: hello"),
            Some(FeedEvent::Connected(serde_json::json!({ "ok": true })))
        );
        assert_eq!(parse_sse_event("data: {}"), None);
        assert_eq!(parse_sse_event(": keep-alive"), None);
    }

    #[test]
    fn test_take_utf8_keeps_split_sequence() {
        let bytes = "€".as_bytes();
        let mut pending = bytes[..2].to_vec();
        assert_eq!(take_utf8(&mut pending), "");
        assert_eq!(pending.len(), 2);
        pending.extend_from_slice(&bytes[2..]);
        assert_eq!(take_utf8(&mut pending), "€");
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_feed_forwards_events() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/public/events/updates");
                then.status(200)
                    .header("content-type", "text/event-stream")
                    .body(
                        "event: connected\ndata: {\"ok\":true}\n\n\
                         event: inventory-changed\ndata: {\"reason\":\"RESTOCK\"}\n\n\
                         event: inventory-changed\ndata: {\"reason\":\"ORDER_CREATED\"}\n\n",
                    );
            })
            .await;

        let config = ClientConfig::for_url(&format!("{}/api", server.base_url())).unwrap();
        let api = ApiClient::new(&config).unwrap();
        let mut feed = InventoryFeed::connect_with_retry(&api, Duration::from_secs(60)).unwrap();

        assert!(matches!(feed.next().await, Some(FeedEvent::Connected(_))));
        let batch = feed
            .next_debounced(Duration::from_millis(200))
            .await
            .unwrap();
        let reasons: Vec<_> = batch.iter().filter_map(|e| e.reason.as_deref()).collect();
        assert_eq!(reasons, vec!["RESTOCK", "ORDER_CREATED"]);
    }
}
