//! Catalog product types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::ProductCategory;
use super::id::ProductId;

/// Image shown when a product has no picture of its own.
pub const PLACEHOLDER_IMAGE: &str = "/images/products/placeholder.jpg";

/// A catalog product as reported by the backend.
///
/// The backend is the source of truth for price and stock; clients only
/// ever hold snapshots of it. When a promotion is running the backend fills
/// the promo fields and `discounted_price <= old_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Units available. Negative values from the wire are treated as 0.
    pub quantity: i32,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: ProductCategory,

    #[serde(default)]
    pub promo_active: Option<bool>,
    #[serde(default)]
    pub promo_name: Option<String>,
    #[serde(default)]
    pub discount_percent: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub old_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discounted_price: Option<Decimal>,
}

impl Product {
    /// Units available, never negative.
    #[must_use]
    pub fn stock(&self) -> u32 {
        u32::try_from(self.quantity).unwrap_or(0)
    }

    /// Price charged per unit: the discounted price when present, otherwise
    /// the list price.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.discounted_price.unwrap_or(self.price)
    }

    /// Whether a promotion badge should be shown.
    #[must_use]
    pub fn promo_on(&self) -> bool {
        self.promo_active == Some(true) && self.discounted_price.is_some()
    }

    /// Pre-discount price for the strike-through label.
    #[must_use]
    pub fn list_price(&self) -> Decimal {
        self.old_price.unwrap_or(self.price)
    }

    /// Image URL, falling back to the placeholder.
    #[must_use]
    pub fn image(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// Units sold for a product over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesView {
    pub product_id: ProductId,
    pub name: String,
    pub total_sold: i64,
}

/// Body of `POST /api/admin/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: String,
    pub category: ProductCategory,
}

/// Body of `PUT /api/admin/products/{id}`. Stock is changed via restock only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image_url: String,
    pub category: ProductCategory,
}

/// Body of `POST /api/admin/products/{id}/restock`. Negative values remove stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestockRequest {
    pub add_quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const PROMO_JSON: &str = r#"{
        "productId": 3,
        "name": "Phone X",
        "price": 499.9,
        "quantity": 4,
        "imageUrl": "",
        "category": "SMARTPHONES",
        "promoActive": true,
        "promoName": "Spring",
        "discountPercent": 10,
        "oldPrice": 499.9,
        "discountedPrice": 449.91
    }"#;

    #[test]
    fn test_product_parses_promo_fields() {
        let product: Product = serde_json::from_str(PROMO_JSON).expect("valid product");
        assert_eq!(product.product_id, ProductId::new(3));
        assert!(product.promo_on());
        assert_eq!(product.unit_price(), Decimal::new(44991, 2));
        assert_eq!(product.list_price(), Decimal::new(4999, 1));
        assert_eq!(product.image(), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_product_without_promo_fields() {
        let product: Product = serde_json::from_str(
            r#"{"productId":1,"name":"Cable","price":5,"quantity":-2,"category":"ACCESSORI","promoName":null}"#,
        )
        .expect("valid product");
        assert!(!product.promo_on());
        assert_eq!(product.unit_price(), Decimal::new(5, 0));
        assert_eq!(product.stock(), 0);
    }

    #[test]
    fn test_restock_request_wire_name() {
        let json = serde_json::to_value(RestockRequest { add_quantity: -3 }).expect("serializable");
        assert_eq!(json, serde_json::json!({ "addQuantity": -3 }));
    }

    #[test]
    fn test_create_request_sends_price_as_number() {
        let request = CreateProductRequest {
            name: "Monitor 27".to_string(),
            price: Decimal::new(19999, 2),
            quantity: 3,
            image_url: String::new(),
            category: ProductCategory::Monitor,
        };
        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json["price"], serde_json::json!(199.99));
        assert_eq!(json["category"], serde_json::json!("MONITOR"));
    }
}
