//! Order listing, search and deletion.

use chrono::NaiveDateTime;
use tracing::{info, instrument};
use vetrina_client::ApiError;
use vetrina_core::types::local_time;
use vetrina_core::{Order, OrderId, Page};

use crate::client::AdminClient;
use crate::date_range::DateRange;
use crate::error::RangeError;

/// Newest orders first.
pub const ORDER_SORT: &str = "dateTime,desc";
/// Orders per page in the console.
pub const ORDER_PAGE_SIZE: u32 = 10;

/// Quick period understood by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderPeriod {
    Day,
    Week,
    Month,
}

impl OrderPeriod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Week => "WEEK",
            Self::Month => "MONTH",
        }
    }
}

impl std::str::FromStr for OrderPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAY" => Ok(Self::Day),
            "WEEK" => Ok(Self::Week),
            "MONTH" => Ok(Self::Month),
            other => Err(format!("unknown period '{other}' (expected DAY, WEEK or MONTH)")),
        }
    }
}

// =============================================================================
// OrderSearch
// =============================================================================

/// Parameters of `GET /api/admin/orders/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSearch {
    pub page: u32,
    pub size: u32,
    pub sort: String,
    pub customer: Option<String>,
    pub product: Option<String>,
    pub city: Option<String>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
    pub period: Option<OrderPeriod>,
}

impl Default for OrderSearch {
    fn default() -> Self {
        Self {
            page: 0,
            size: ORDER_PAGE_SIZE,
            sort: ORDER_SORT.to_string(),
            customer: None,
            product: None,
            city: None,
            from: None,
            to: None,
            period: None,
        }
    }
}

impl OrderSearch {
    /// Query string pairs. Blank text filters are dropped, and the period
    /// is only sent when neither `from` nor `to` is.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sort", self.sort.clone()),
        ];

        let text = [
            ("customer", &self.customer),
            ("product", &self.product),
            ("city", &self.city),
        ];
        for (key, value) in text {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((key, v.to_string()));
            }
        }

        if let Some(from) = &self.from {
            params.push(("from", local_time::format(from)));
        }
        if let Some(to) = &self.to {
            params.push(("to", local_time::format(to)));
        }
        if self.from.is_none()
            && self.to.is_none()
            && let Some(period) = self.period
        {
            params.push(("period", period.as_str().to_string()));
        }
        params
    }
}

// =============================================================================
// OrderFilters
// =============================================================================

/// The filter form above the order table.
///
/// A date range and a quick period are mutually exclusive: setting one
/// clears the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilters {
    pub customer: String,
    pub product: String,
    pub city: String,
    period: Option<OrderPeriod>,
    range: DateRange,
}

impl OrderFilters {
    #[must_use]
    pub const fn period(&self) -> Option<OrderPeriod> {
        self.period
    }

    #[must_use]
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// Choose a quick period; clears the date range.
    pub fn set_period(&mut self, period: Option<OrderPeriod>) {
        self.period = period;
        if period.is_some() {
            self.range = DateRange::default();
        }
    }

    /// Choose a date range; a non-empty range clears the quick period.
    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
        if !range.is_empty() {
            self.period = None;
        }
    }

    /// Back to no filters at all.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build the search for the first page.
    ///
    /// # Errors
    ///
    /// Returns `RangeError::EndBeforeStart` for an inverted range.
    pub fn apply(&self) -> Result<OrderSearch, RangeError> {
        let bounds = self.range.bounds()?;
        let text = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        Ok(OrderSearch {
            customer: text(&self.customer),
            product: text(&self.product),
            city: text(&self.city),
            from: bounds.map(|(from, _)| from),
            to: bounds.map(|(_, to)| to),
            period: if bounds.is_some() { None } else { self.period },
            ..OrderSearch::default()
        })
    }
}

// =============================================================================
// Endpoints
// =============================================================================

impl AdminClient {
    /// Plain listing, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self, page: u32, size: u32) -> Result<Page<Order>, ApiError> {
        self.api()
            .get_json_with(
                "/api/admin/orders",
                &[
                    ("page", page.to_string()),
                    ("size", size.to_string()),
                    ("sort", ORDER_SORT.to_string()),
                ],
            )
            .await
    }

    /// Filtered listing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, search), fields(page = search.page))]
    pub async fn search_orders(&self, search: &OrderSearch) -> Result<Page<Order>, ApiError> {
        self.api()
            .get_json_with("/api/admin/orders/search", &search.params())
            .await
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ApiError> {
        self.api().delete(&format!("/api/admin/orders/{id}")).await?;
        info!(order_id = %id, "Order deleted");
        Ok(())
    }
}
