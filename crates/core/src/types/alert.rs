//! Low-stock alerts.

use serde::{Deserialize, Serialize};

use super::id::{AlertId, ProductId};
use super::status::AlertStatus;

/// Raised by the backend when a product's stock falls to its threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub id: AlertId,
    pub product_id: ProductId,
    pub product_name: String,
    pub current_quantity: i32,
    pub threshold: i32,
    pub status: AlertStatus,
    /// Kept verbatim: the backend may send ISO or pre-formatted text.
    #[serde(default)]
    pub created_at: String,
}

impl StockAlert {
    /// Whether the alert still needs an acknowledgement.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == AlertStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_parses() {
        let alert: StockAlert = serde_json::from_str(
            r#"{"id":9,"productId":3,"productName":"Phone X","currentQuantity":1,
                "threshold":2,"status":"OPEN","createdAt":"2025-05-01T08:00:00"}"#,
        )
        .expect("valid alert");
        assert!(alert.is_open());
        assert_eq!(alert.id, AlertId::new(9));
    }
}
