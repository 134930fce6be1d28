//! Vetrina client plumbing.
//!
//! Everything of record (prices, stock, orders, promotions, accounts) lives
//! in the remote REST backend. This crate is the typed way to reach it:
//!
//! - [`ClientConfig`] - settings loaded from the environment
//! - [`ApiClient`] - JSON over HTTP with bearer-token injection
//! - [`SessionStore`] - the signed-in / guest state shared by every screen
//! - [`auth`] - login, registration and logout
//! - [`realtime`] - the server-push inventory feed
//!
//! # Example
//!
//! ```rust,ignore
//! use vetrina_client::{ApiClient, ClientConfig, auth};
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config)?;
//! auth::login(&api, "anna", "secret").await?;
//! assert!(api.session().snapshot().can_shop());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod api;
pub mod auth;
pub mod config;
mod error;
pub mod realtime;
pub mod session;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError, Credentials};
pub use error::{ApiError, ErrorKind};
pub use realtime::{FeedEvent, InventoryEvent, InventoryFeed};
pub use reqwest::StatusCode;
pub use session::{Session, SessionAction, SessionStore};
