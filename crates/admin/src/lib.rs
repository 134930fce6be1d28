//! Vetrina admin console operations.
//!
//! Everything here needs an `ADMIN` session on the shared
//! [`ApiClient`](vetrina_client::ApiClient):
//!
//! - [`orders`] - listing, filtered search and deletion
//! - [`products`] - CRUD, stock adjustments and sales stats
//! - [`alerts`] - low-stock alerts and the open-alert badge
//! - [`promotions`] - percentage promotions over a date window
//! - [`date_range`] - the two-click range picker used by orders and promotions
//! - [`live`] - product dashboard refreshed from the inventory feed

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod alerts;
mod client;
pub mod date_range;
mod error;
pub mod live;
pub mod orders;
pub mod products;
pub mod promotions;

pub use alerts::{AlertBadge, Poller};
pub use client::AdminClient;
pub use date_range::{DateRange, DateRangePicker};
pub use error::{ProductFieldError, PromotionDraftError, RangeError, StockAdjustmentError};
pub use live::{Dashboard, LiveDashboard};
pub use orders::{OrderFilters, OrderPeriod, OrderSearch};
pub use products::{ProductForm, SalesStats, StatsPeriod, StockChange, StockMode};
pub use promotions::PromotionDraft;
