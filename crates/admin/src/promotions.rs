//! Promotions: listing, creation, activation and archiving.

use std::cmp::Ordering;

use serde_json::json;
use tracing::{info, instrument};
use vetrina_client::ApiError;
use vetrina_core::types::local_time;
use vetrina_core::{
    CreatePromotionRequest, ProductId, Promotion, PromotionId, PromotionItemRequest,
    UpdatePromotionRequest,
};

use crate::client::AdminClient;
use crate::date_range::DateRange;
use crate::error::PromotionDraftError;

/// Discount prefilled when a product is added to a draft.
pub const DEFAULT_DISCOUNT: &str = "10";
/// Allowed discount, in percent.
pub const DISCOUNT_RANGE: std::ops::RangeInclusive<i32> = 1..=90;
/// Archived promotions shown per page.
pub const ARCHIVED_PAGE_SIZE: usize = 3;

// =============================================================================
// Endpoints
// =============================================================================

impl AdminClient {
    /// All promotions; archived ones only when asked.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn promotions(&self, include_archived: bool) -> Result<Vec<Promotion>, ApiError> {
        self.api()
            .get_json_with(
                "/api/admin/promotions",
                &[("includeArchived", include_archived.to_string())],
            )
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` (404 for an unknown id).
    #[instrument(skip(self))]
    pub async fn promotion(&self, id: PromotionId) -> Result<Promotion, ApiError> {
        self.api()
            .get_json(&format!("/api/admin/promotions/{id}"))
            .await
    }

    /// Create a promotion. The name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects it (for example an
    /// overlapping promotion on the same product).
    #[instrument(skip(self, request), fields(name = %request.name, items = request.items.len()))]
    pub async fn create_promotion(
        &self,
        request: &CreatePromotionRequest,
    ) -> Result<Promotion, ApiError> {
        let request = CreatePromotionRequest {
            name: request.name.trim().to_string(),
            ..request.clone()
        };
        let promotion: Promotion = self
            .api()
            .post_json("/api/admin/promotions", &request)
            .await?;
        info!(promotion_id = %promotion.id, "Promotion created");
        Ok(promotion)
    }

    /// Partial update; `None` fields are sent as `null` and left alone.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the update.
    #[instrument(skip(self, request))]
    pub async fn update_promotion(
        &self,
        id: PromotionId,
        request: &UpdatePromotionRequest,
    ) -> Result<Promotion, ApiError> {
        let request = UpdatePromotionRequest {
            name: request.name.as_deref().map(|n| n.trim().to_string()),
            ..request.clone()
        };
        self.api()
            .put_json(&format!("/api/admin/promotions/{id}"), &request)
            .await
    }

    /// Flip a promotion's active flag.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the update.
    #[instrument(skip(self, promotion), fields(promotion_id = %promotion.id))]
    pub async fn toggle_promotion(&self, promotion: &Promotion) -> Result<Promotion, ApiError> {
        let updated = self
            .update_promotion(
                promotion.id,
                &UpdatePromotionRequest {
                    active: Some(!promotion.active),
                    ..UpdatePromotionRequest::default()
                },
            )
            .await?;
        info!(active = updated.active, "Promotion toggled");
        Ok(updated)
    }

    /// Archive a promotion: it is switched off and leaves the standard list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses.
    #[instrument(skip(self))]
    pub async fn archive_promotion(&self, id: PromotionId) -> Result<Promotion, ApiError> {
        let promotion: Promotion = self
            .api()
            .post_json(&format!("/api/admin/promotions/{id}/archive"), &json!({}))
            .await?;
        info!(promotion_id = %id, "Promotion archived");
        Ok(promotion)
    }
}

// =============================================================================
// Listing helpers
// =============================================================================

/// Split into standard and archived promotions. Archived ones come most
/// recently ended first, then by id descending; open-ended ones last.
#[must_use]
pub fn split_archived(promotions: Vec<Promotion>) -> (Vec<Promotion>, Vec<Promotion>) {
    let (mut archived, standard): (Vec<_>, Vec<_>) =
        promotions.into_iter().partition(Promotion::is_archived);
    archived.sort_by(archived_order);
    (standard, archived)
}

fn archived_order(a: &Promotion, b: &Promotion) -> Ordering {
    b.ends_at.cmp(&a.ends_at).then_with(|| b.id.cmp(&a.id))
}

/// One page of the archived list and the page count. `page` is clamped to
/// the last page.
#[must_use]
pub fn archived_page(archived: &[Promotion], page: usize) -> (&[Promotion], usize) {
    let pages = archived.len().div_ceil(ARCHIVED_PAGE_SIZE).max(1);
    let page = page.min(pages - 1);
    let start = (page * ARCHIVED_PAGE_SIZE).min(archived.len());
    let end = (start + ARCHIVED_PAGE_SIZE).min(archived.len());
    (archived.get(start..end).unwrap_or_default(), pages)
}

// =============================================================================
// PromotionDraft
// =============================================================================

/// A product picked for a draft, with the discount as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftItem {
    pub product_id: ProductId,
    pub discount: String,
}

/// The "new promotion" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionDraft {
    pub name: String,
    pub active: bool,
    pub range: DateRange,
    items: Vec<DraftItem>,
}

impl Default for PromotionDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            active: true,
            range: DateRange::default(),
            items: Vec::new(),
        }
    }
}

impl PromotionDraft {
    #[must_use]
    pub fn items(&self) -> &[DraftItem] {
        &self.items
    }

    #[must_use]
    pub fn is_selected(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// Add the product with the default discount, or remove it if already
    /// picked. Returns whether it is now selected.
    pub fn toggle_product(&mut self, product_id: ProductId) -> bool {
        if self.is_selected(product_id) {
            self.remove(product_id);
            false
        } else {
            self.items.push(DraftItem {
                product_id,
                discount: DEFAULT_DISCOUNT.to_string(),
            });
            true
        }
    }

    pub fn set_discount(&mut self, product_id: ProductId, discount: impl Into<String>) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.discount = discount.into();
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product_id != product_id);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate and build the create request.
    ///
    /// The window runs from the first day at `00:00` to the last at `23:59`.
    /// Items with an invalid product id or a discount outside
    /// [`DISCOUNT_RANGE`] are dropped.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in form order.
    pub fn to_request(&self) -> Result<CreatePromotionRequest, PromotionDraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PromotionDraftError::MissingName);
        }

        let (Some(start), Some(end)) = (self.range.start, self.range.end) else {
            return Err(PromotionDraftError::IncompletePeriod);
        };
        if end < start {
            return Err(PromotionDraftError::EndBeforeStart);
        }

        let items: Vec<PromotionItemRequest> = self
            .items
            .iter()
            .filter(|item| item.product_id.as_i64() > 0)
            .filter_map(|item| {
                let discount = item.discount.trim().parse::<i32>().ok()?;
                DISCOUNT_RANGE
                    .contains(&discount)
                    .then_some(PromotionItemRequest {
                        product_id: item.product_id,
                        discount_percent: discount,
                    })
            })
            .collect();
        if items.is_empty() {
            return Err(PromotionDraftError::NoValidItems);
        }

        Ok(CreatePromotionRequest {
            name: name.to_string(),
            starts_at: local_time::start_of_day(start),
            ends_at: local_time::end_of_day(end),
            active: self.active,
            items,
        })
    }
}
