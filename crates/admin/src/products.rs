//! Product management: listing, CRUD, stock adjustments and sales stats.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use vetrina_client::ApiError;
use vetrina_core::{
    CreateProductRequest, Page, Product, ProductCategory, ProductId, ProductQuery,
    ProductSalesView, RestockRequest, UpdateProductRequest,
};

use crate::client::AdminClient;
use crate::error::{ProductFieldError, StockAdjustmentError};

/// Row counts offered for the stats panels.
pub const STATS_LIMITS: [u32; 3] = [3, 5, 10];
/// Rows per stats panel unless chosen otherwise.
pub const DEFAULT_STATS_LIMIT: u32 = 3;

/// Shown when the backend refuses a day window and all-time stats are
/// served instead.
pub const STATS_FALLBACK_NOTICE: &str =
    "The backend does not support the period filter (7/30 days) yet. Showing all-time statistics.";

// =============================================================================
// Endpoints
// =============================================================================

impl AdminClient {
    /// One page of the admin product list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self), fields(q = %query.q, page = query.page))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Page<Product>, ApiError> {
        self.api()
            .get_json_with("/api/admin/products", &query.params())
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` (404 for an unknown id).
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.api().get_json(&format!("/api/admin/products/{id}")).await
    }

    /// Category codes, from the public catalog endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<ProductCategory>, ApiError> {
        self.api()
            .get_json("/api/public/products/categories")
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the product.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_product(&self, request: &CreateProductRequest) -> Result<Product, ApiError> {
        let product: Product = self.api().post_json("/api/admin/products", request).await?;
        info!(product_id = %product.product_id, "Product created");
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the update.
    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        id: ProductId,
        request: &UpdateProductRequest,
    ) -> Result<Product, ApiError> {
        let product: Product = self
            .api()
            .put_json(&format!("/api/admin/products/{id}"), request)
            .await?;
        info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses (for example a product
    /// referenced by orders).
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.api()
            .delete(&format!("/api/admin/products/{id}"))
            .await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Add `delta` units (negative removes). Prefer building `delta` with
    /// [`StockChange::parse`], which rejects changes that would go below 0.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses the change.
    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, delta: i32) -> Result<Product, ApiError> {
        let product: Product = self
            .api()
            .post_json(
                &format!("/api/admin/products/{id}/restock"),
                &RestockRequest {
                    add_quantity: delta,
                },
            )
            .await?;
        info!(product_id = %id, delta, quantity = product.quantity, "Stock adjusted");
        Ok(product)
    }

    /// Best sellers over `period`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn top_selling(
        &self,
        limit: u32,
        period: StatsPeriod,
    ) -> Result<Vec<ProductSalesView>, ApiError> {
        self.api()
            .get_json_with("/api/admin/products/stats/top-selling", &stats_params(limit, period))
            .await
    }

    /// Worst sellers over `period`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn least_selling(
        &self,
        limit: u32,
        period: StatsPeriod,
    ) -> Result<Vec<ProductSalesView>, ApiError> {
        self.api()
            .get_json_with("/api/admin/products/stats/least-selling", &stats_params(limit, period))
            .await
    }

    /// Both stats panels.
    ///
    /// A backend without day-window support answers 400 or 404 for
    /// [`StatsPeriod::Days7`] and [`StatsPeriod::Days30`]; the stats are then
    /// reloaded for [`StatsPeriod::All`] and the result carries a notice.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for any other failure.
    #[instrument(skip(self))]
    pub async fn sales_stats(&self, limit: u32, period: StatsPeriod) -> Result<SalesStats, ApiError> {
        match self.stats_for(limit, period).await {
            Ok(stats) => Ok(stats),
            Err(e) if period != StatsPeriod::All && is_unsupported_window(&e) => {
                warn!(error = %e, ?period, "Period filter unsupported; falling back to all-time stats");
                let mut stats = self.stats_for(limit, StatsPeriod::All).await?;
                stats.notice = Some(STATS_FALLBACK_NOTICE.to_string());
                Ok(stats)
            }
            Err(e) => Err(e),
        }
    }

    async fn stats_for(&self, limit: u32, period: StatsPeriod) -> Result<SalesStats, ApiError> {
        let (top, least) = tokio::try_join!(
            self.top_selling(limit, period),
            self.least_selling(limit, period)
        )?;
        Ok(SalesStats {
            top,
            least,
            period,
            notice: None,
        })
    }
}

fn stats_params(limit: u32, period: StatsPeriod) -> Vec<(&'static str, String)> {
    let mut params = vec![("limit", limit.to_string())];
    if let Some(days) = period.days() {
        params.push(("days", days.to_string()));
    }
    params
}

fn is_unsupported_window(err: &ApiError) -> bool {
    matches!(err.status().map(|s| s.as_u16()), Some(400 | 404))
}

// =============================================================================
// Sales stats
// =============================================================================

/// Time window for the sales stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatsPeriod {
    #[default]
    All,
    Days7,
    Days30,
}

impl StatsPeriod {
    /// The `days` query value, absent for all-time.
    #[must_use]
    pub const fn days(self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::Days7 => Some(7),
            Self::Days30 => Some(30),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all time",
            Self::Days7 => "last 7 days",
            Self::Days30 => "last 30 days",
        }
    }
}

impl FromStr for StatsPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "7" | "d7" => Ok(Self::Days7),
            "30" | "d30" => Ok(Self::Days30),
            other => Err(format!("unknown stats period '{other}' (expected all, 7 or 30)")),
        }
    }
}

/// Top and least sellers for one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesStats {
    pub top: Vec<ProductSalesView>,
    pub least: Vec<ProductSalesView>,
    /// Window actually served; differs from the one asked for after a
    /// fallback.
    pub period: StatsPeriod,
    pub notice: Option<String>,
}

// =============================================================================
// Stock adjustments
// =============================================================================

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockMode {
    #[default]
    Add,
    Remove,
}

/// A validated stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    /// Units entered, always positive.
    pub amount: i32,
    /// Signed change sent to the backend.
    pub delta: i32,
}

impl StockChange {
    /// Validate the entered amount against the current stock.
    ///
    /// `raw` is trimmed and must be a whole number greater than 0.
    ///
    /// # Errors
    ///
    /// Returns `StockAdjustmentError::InvalidQuantity` for anything else and
    /// `StockAdjustmentError::BelowZero` if removing would leave negative
    /// stock.
    pub fn parse(mode: StockMode, raw: &str, current: i32) -> Result<Self, StockAdjustmentError> {
        let amount = parse_whole_number(raw)
            .filter(|n| *n > 0)
            .ok_or(StockAdjustmentError::InvalidQuantity)?;

        let delta = match mode {
            StockMode::Add => amount,
            StockMode::Remove => -amount,
        };
        if i64::from(current) + i64::from(delta) < 0 {
            return Err(StockAdjustmentError::BelowZero { current });
        }
        Ok(Self { amount, delta })
    }

    /// Confirmation shown after the change went through.
    #[must_use]
    pub fn message(&self, id: ProductId) -> String {
        if self.delta > 0 {
            format!("Stock increased by {} for #{id}.", self.amount)
        } else {
            format!("Stock decreased by {} for #{id}.", self.amount)
        }
    }
}

/// Whole number in `i32` range. Accepts `"5"`, `"5.0"` and `"5e1"`.
fn parse_whole_number(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<i32>() {
        return Some(n);
    }
    let n = raw.parse::<f64>().ok().filter(|n| n.is_finite() && n.fract() == 0.0)?;
    if n < f64::from(i32::MIN) || n > f64::from(i32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(n as i32)
}

// =============================================================================
// Product form
// =============================================================================

/// Parse a euro amount the way people type it.
///
/// Spaces and `€` are dropped. With both `,` and `.` present the dots are
/// thousands separators and the comma is the decimal point
/// (`"1.299,50"`); a lone comma is the decimal point (`"199,99"`).
#[must_use]
pub fn parse_euro_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '€')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.contains(','), cleaned.contains('.')) {
        (true, true) => cleaned.replace('.', "").replacen(',', ".", 1),
        (true, false) => cleaned.replacen(',', ".", 1),
        _ => cleaned,
    };
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// The create/edit product form, as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub image_url: String,
    pub category: Option<ProductCategory>,
}

impl ProductForm {
    /// Prefill from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.normalize().to_string(),
            quantity: product.quantity.to_string(),
            image_url: product.image_url.clone().unwrap_or_default(),
            category: Some(product.category.clone()),
        }
    }

    /// Body for a new product.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn to_create_request(&self) -> Result<CreateProductRequest, Vec<ProductFieldError>> {
        let mut errors = Vec::new();
        let common = self.validate_common(&mut errors);
        let quantity = self.validate_quantity(&mut errors);

        match (common, quantity) {
            (Some((name, price, image_url, category)), Some(quantity)) if errors.is_empty() => {
                Ok(CreateProductRequest {
                    name,
                    price,
                    quantity,
                    image_url,
                    category,
                })
            }
            _ => Err(errors),
        }
    }

    /// Body for an edit. Stock is not part of an edit.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn to_update_request(&self) -> Result<UpdateProductRequest, Vec<ProductFieldError>> {
        let mut errors = Vec::new();
        match self.validate_common(&mut errors) {
            Some((name, price, image_url, category)) if errors.is_empty() => {
                Ok(UpdateProductRequest {
                    name,
                    price,
                    image_url,
                    category,
                })
            }
            _ => Err(errors),
        }
    }

    fn validate_common(
        &self,
        errors: &mut Vec<ProductFieldError>,
    ) -> Option<(String, Decimal, String, ProductCategory)> {
        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ProductFieldError::MissingName);
        }

        let price = if self.price.trim().is_empty() {
            errors.push(ProductFieldError::MissingPrice);
            None
        } else {
            match parse_euro_amount(&self.price) {
                None => {
                    errors.push(ProductFieldError::InvalidPrice);
                    None
                }
                Some(p) if p <= Decimal::ZERO => {
                    errors.push(ProductFieldError::NonPositivePrice);
                    None
                }
                Some(p) => Some(p),
            }
        };

        let image_url = self.image_url.trim();
        if image_url.is_empty() {
            errors.push(ProductFieldError::MissingImageUrl);
        }

        if self.category.is_none() {
            errors.push(ProductFieldError::MissingCategory);
        }

        Some((
            name.to_string(),
            price?,
            image_url.to_string(),
            self.category.clone()?,
        ))
    }

    fn validate_quantity(&self, errors: &mut Vec<ProductFieldError>) -> Option<i32> {
        if self.quantity.trim().is_empty() {
            errors.push(ProductFieldError::MissingQuantity);
            return None;
        }
        match parse_whole_number(&self.quantity) {
            None => {
                errors.push(ProductFieldError::InvalidQuantity);
                None
            }
            Some(q) if q < 0 => {
                errors.push(ProductFieldError::NegativeQuantity);
                None
            }
            Some(q) => Some(q),
        }
    }
}
