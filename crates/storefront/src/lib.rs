//! Vetrina storefront: everything a shopper does.
//!
//! # Architecture
//!
//! - The backend is the source of truth for price and stock; this crate only
//!   holds snapshots of it
//! - [`Cart`] keeps cart quantities within the last-known stock and clamps
//!   them down whenever a fresh catalog page arrives
//! - [`Shop`] ties the catalog query, the cart and the session role together
//!   and performs checkout
//! - [`StorefrontClient`] wraps the REST calls; categories are cached for
//!   5 minutes via `moka`
//!
//! # Example
//!
//! ```rust,ignore
//! use vetrina_storefront::{Shop, StorefrontClient};
//!
//! let mut shop = Shop::new(StorefrontClient::new(api));
//! shop.refresh().await?;
//! shop.stage_add(product_id, 2);
//! let order = shop.checkout().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
mod client;
mod error;
pub mod orders;
pub mod profile;
pub mod shop;

pub use cart::{Cart, CartLine, Clamp};
pub use catalog::ProductQuery;
pub use client::StorefrontClient;
pub use error::{CheckoutError, PasswordError};
pub use shop::Shop;
