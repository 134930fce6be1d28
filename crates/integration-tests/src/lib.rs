//! Shared harness for the Vetrina end-to-end tests.
//!
//! Each test starts its own [`MockServer`] standing in for the backend and
//! drives the real clients against it:
//!
//! ```rust,ignore
//! let ctx = TestContext::start().await;
//! ctx.mock_login("anna", Role::User).await;
//! let api = ctx.api();
//! auth::login(&api, "anna", "secret").await?;
//! ```
//!
//! # Test files
//!
//! - `checkout_flow` - login, catalog, cart reconciliation and checkout
//! - `admin_console` - stock adjustments, alerts, order search, promotions

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use httpmock::prelude::*;
use serde_json::{Value, json};
use vetrina_client::{ApiClient, ClientConfig};
use vetrina_core::Role;

/// A mocked backend plus helpers for the responses most tests need.
pub struct TestContext {
    pub server: MockServer,
}

impl TestContext {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start_async().await,
        }
    }

    /// Client configuration pointing at the mock server.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::for_url(&self.server.base_url()).unwrap()
    }

    /// A fresh client with its own, empty session.
    #[must_use]
    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.config()).unwrap()
    }

    /// Accept any password for `username` and hand back a token for `role`.
    pub async fn mock_login(&self, username: &str, role: Role) {
        let token = format!("token-{username}");
        let body = json!({ "username": username }).to_string();
        let role = String::from(role);
        self.server
            .mock_async(move |when, then| {
                when.method(POST)
                    .path("/api/auth/login")
                    .json_body_partial(body);
                then.status(200)
                    .json_body(json!({ "token": token, "role": role }));
            })
            .await;
    }

    /// Serve `products` as the single page of the public catalog.
    pub async fn mock_catalog(&self, products: Vec<Value>) -> httpmock::Mock<'_> {
        let page = page_json(products);
        self.server
            .mock_async(move |when, then| {
                when.method(GET).path("/api/public/products");
                then.status(200).json_body(page);
            })
            .await
    }
}

/// A catalog product as the backend sends it.
#[must_use]
pub fn product_json(id: i64, name: &str, price: f64, quantity: i32) -> Value {
    json!({
        "productId": id,
        "name": name,
        "price": price,
        "quantity": quantity,
        "category": "ACCESSORI",
        "promoActive": false
    })
}

/// A single, complete page around `content`.
#[must_use]
pub fn page_json(content: Vec<Value>) -> Value {
    let total = content.len();
    json!({
        "content": content,
        "number": 0,
        "size": 10,
        "totalElements": total,
        "totalPages": 1,
        "first": true,
        "last": true
    })
}

/// A placed order echoing `lines` of `(product_id, quantity, price)`.
#[must_use]
pub fn order_json(id: i64, lines: &[(i64, i32, f64)], note: Option<&str>) -> Value {
    let products: Vec<Value> = lines
        .iter()
        .map(|(product_id, quantity, price)| {
            json!({
                "productId": product_id,
                "orderedQuantity": quantity,
                "name": format!("Product {product_id}"),
                "price": price
            })
        })
        .collect();
    json!({
        "idOrder": id,
        "dateTime": "2025-03-14T10:15:00",
        "idUser": 4,
        "firstName": "Anna",
        "lastName": "Rossi",
        "address": "Via Roma 1",
        "city": "Milano",
        "phone": "3331234567",
        "description": note,
        "products": products
    })
}
