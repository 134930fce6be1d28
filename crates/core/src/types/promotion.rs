//! Time-boxed percentage promotions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, PromotionId};
use super::local_time;

/// A promotion as returned by the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: PromotionId,
    pub name: String,
    #[serde(default, with = "local_time::option")]
    pub starts_at: Option<NaiveDateTime>,
    #[serde(default, with = "local_time::option")]
    pub ends_at: Option<NaiveDateTime>,
    pub active: bool,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub items: Vec<PromotionItem>,
}

/// Where a promotion stands relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionPhase {
    /// Hidden from the standard list; no longer applies.
    Archived,
    /// Switched off by an admin.
    Inactive,
    /// Active but its window has not opened yet.
    Scheduled,
    /// Active and inside its window.
    Running,
    /// Active but its window has closed.
    Expired,
}

impl PromotionPhase {
    /// Short label for listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Archived => "archived",
            Self::Inactive => "inactive",
            Self::Scheduled => "scheduled",
            Self::Running => "running",
            Self::Expired => "expired",
        }
    }
}

impl Promotion {
    /// Whether the promotion has been archived.
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.archived == Some(true)
    }

    /// Phase of the promotion at `now`. An open bound never excludes.
    #[must_use]
    pub fn phase_at(&self, now: NaiveDateTime) -> PromotionPhase {
        if self.is_archived() {
            return PromotionPhase::Archived;
        }
        if !self.active {
            return PromotionPhase::Inactive;
        }
        match (self.starts_at, self.ends_at) {
            (Some(start), _) if now < start => PromotionPhase::Scheduled,
            (_, Some(end)) if now > end => PromotionPhase::Expired,
            _ => PromotionPhase::Running,
        }
    }
}

/// A product covered by a promotion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub discount_percent: i32,
}

/// A product to include in a new promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionItemRequest {
    pub product_id: ProductId,
    pub discount_percent: i32,
}

/// Body of `POST /api/admin/promotions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionRequest {
    pub name: String,
    #[serde(with = "local_time")]
    pub starts_at: NaiveDateTime,
    #[serde(with = "local_time")]
    pub ends_at: NaiveDateTime,
    pub active: bool,
    pub items: Vec<PromotionItemRequest>,
}

/// Body of `PUT /api/admin/promotions/{id}`. `None` fields are sent as
/// `null` and left unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromotionRequest {
    pub name: Option<String>,
    #[serde(default, with = "local_time::option")]
    pub starts_at: Option<NaiveDateTime>,
    #[serde(default, with = "local_time::option")]
    pub ends_at: Option<NaiveDateTime>,
    pub active: Option<bool>,
    pub archived: Option<bool>,
}
