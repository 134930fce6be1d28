//! JSON-over-HTTP client for the Vetrina backend.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::{SessionAction, SessionStore};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Vetrina REST backend.
///
/// Attaches `Authorization: Bearer <token>` whenever the shared
/// [`SessionStore`] holds a token, and signs the session out when the
/// backend answers 401. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    /// No overall timeout: used for long-lived event streams.
    stream_client: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client with a fresh, empty session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_session(config, SessionStore::new())
    }

    /// Create a client that shares an existing session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn with_session(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        let stream_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                stream_client,
                base_url: config.api_url.clone(),
                session,
            }),
        })
    }

    /// The session this client reads its token from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub(crate) fn stream_client(&self) -> &reqwest::Client {
        &self.inner.stream_client
    }

    /// Resolve `path` against the base URL, keeping any base path prefix.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        let builder = self.inner.client.request(method, url);
        Ok(match self.inner.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Send a request and turn non-success statuses into `ApiError::Status`.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            // Token missing, invalid or expired; callers decide what to show.
            self.inner.session.dispatch(SessionAction::SignedOut);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Backend returned non-success status"
        );

        Err(ApiError::Status {
            status,
            message: extract_message(&body),
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, non-success status, or a
    /// body that does not match `T`.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET");
        let response = self.send(self.request(Method::GET, path)?).await?;
        Self::parse(response).await
    }

    /// `GET` a JSON resource with query parameters.
    ///
    /// # Errors
    ///
    /// Same as [`get_json`](Self::get_json).
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get_json_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        debug!("GET with query");
        let response = self
            .send(self.request(Method::GET, path)?.query(query))
            .await?;
        Self::parse(response).await
    }

    /// `POST` a JSON body and parse the JSON answer.
    ///
    /// # Errors
    ///
    /// Same as [`get_json`](Self::get_json).
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST");
        let response = self
            .send(self.request(Method::POST, path)?.json(body))
            .await?;
        Self::parse(response).await
    }

    /// `POST` a JSON body and ignore whatever comes back.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-success status.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post_empty<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!("POST (no response body)");
        self.send(self.request(Method::POST, path)?.json(body))
            .await?;
        Ok(())
    }

    /// `PUT` a JSON body and parse the JSON answer.
    ///
    /// # Errors
    ///
    /// Same as [`get_json`](Self::get_json).
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("PUT");
        let response = self
            .send(self.request(Method::PUT, path)?.json(body))
            .await?;
        Self::parse(response).await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or non-success status.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!("DELETE");
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }
}

/// Pull `message` out of an error body such as
/// `{"status":409,"message":"Email already in use"}`.
fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
