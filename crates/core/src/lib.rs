//! Vetrina Core - Shared types library.
//!
//! This crate provides common types used across all Vetrina components:
//! - `client` - REST plumbing, session state and the inventory feed
//! - `storefront` - Catalog, cart reconciliation and checkout for shoppers
//! - `admin` - Order search, product, alert and promotion management
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, wire DTOs, pagination, money formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
