//! Order types.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId, UserId};
use super::local_time;

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id_order: OrderId,
    #[serde(with = "local_time")]
    pub date_time: NaiveDateTime,
    #[serde(default)]
    pub id_user: Option<UserId>,

    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub phone: String,

    /// Free-text note left by the shopper at checkout.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub products: Vec<OrderItem>,
}

impl Order {
    /// Sum of `price × quantity` over the order's items. Items without a
    /// recorded price count as zero.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.products.iter().map(OrderItem::line_total).sum()
    }

    /// Total number of units across all items.
    #[must_use]
    pub fn unit_count(&self) -> i64 {
        self.products
            .iter()
            .map(|item| i64::from(item.ordered_quantity))
            .sum()
    }

    /// `"First Last"`, trimmed.
    #[must_use]
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub ordered_quantity: i32,
    #[serde(default)]
    pub name: Option<String>,
    /// Unit price at the time of purchase.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

impl OrderItem {
    /// `price × quantity`, zero when the price is missing.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO) * Decimal::from(self.ordered_quantity)
    }
}

/// Body of `POST /api/me/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Optional note; sent as `null` when absent.
    pub description: Option<String>,
    pub products: Vec<OrderLine>,
}

/// A requested line in a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub ordered_quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER_JSON: &str = r#"{
        "idOrder": 11,
        "dateTime": "2025-02-01T18:30:12.5",
        "idUser": 4,
        "firstName": "Anna",
        "lastName": "Rossi",
        "address": "Via Roma 1",
        "city": "Torino",
        "phone": "0110000",
        "description": null,
        "products": [
            { "productId": 1, "orderedQuantity": 2, "name": "Cable", "price": 4.5 },
            { "productId": 2, "orderedQuantity": 1, "name": "Case" }
        ]
    }"#;

    #[test]
    fn test_order_total_ignores_missing_prices() {
        let order: Order = serde_json::from_str(ORDER_JSON).expect("valid order");
        assert_eq!(order.total(), Decimal::new(9, 0));
        assert_eq!(order.unit_count(), 3);
        assert_eq!(order.customer_name(), "Anna Rossi");
    }

    #[test]
    fn test_create_order_sends_null_note() {
        let request = CreateOrderRequest {
            description: None,
            products: vec![OrderLine {
                product_id: ProductId::new(5),
                ordered_quantity: 2,
            }],
        };
        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({
                "description": null,
                "products": [{ "productId": 5, "orderedQuantity": 2 }]
            })
        );
    }
}
