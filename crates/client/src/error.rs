//! Errors returned by [`ApiClient`](crate::ApiClient).

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        /// The `message` field of the error body, when present.
        message: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Coarse category of an [`ApiError`], used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401: token missing, invalid or expired.
    Unauthenticated,
    /// 403: signed in but not allowed.
    Forbidden,
    /// 400, 409 or 422: the request was rejected on its merits.
    Conflict,
    /// 404.
    NotFound,
    /// Anything else, including transport failures.
    Other,
}

impl ApiError {
    /// HTTP status, if the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            Self::Parse(_) | Self::Url(_) => None,
        }
    }

    /// Category of the failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self.status() {
            Some(StatusCode::UNAUTHORIZED) => ErrorKind::Unauthenticated,
            Some(StatusCode::FORBIDDEN) => ErrorKind::Forbidden,
            Some(StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY) => {
                ErrorKind::Conflict
            }
            Some(StatusCode::NOT_FOUND) => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        }
    }

    /// The server-supplied `message`, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// One line suitable for showing to a user.
    ///
    /// 401 and 403 get fixed wording; otherwise the server's message wins,
    /// then `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self.kind() {
            ErrorKind::Unauthenticated => "Not authenticated".to_string(),
            ErrorKind::Forbidden => "ADMIN required".to_string(),
            _ => self.server_message().unwrap_or(fallback).to_string(),
        }
    }
}
