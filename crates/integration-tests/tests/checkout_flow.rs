//! Shopper journey against a mocked backend: sign in, browse, fill the cart,
//! survive a stock drop and check out.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use httpmock::prelude::*;
use serde_json::json;
use vetrina_client::auth;
use vetrina_core::{ProductId, Role};
use vetrina_integration_tests::{TestContext, order_json, product_json};
use vetrina_storefront::shop::ORDER_PLACED_MESSAGE;
use vetrina_storefront::{CheckoutError, Shop, StorefrontClient};

const CABLE: ProductId = ProductId::new(1);
const MOUSE: ProductId = ProductId::new(2);

#[tokio::test]
async fn test_browse_stage_and_checkout() {
    let ctx = TestContext::start().await;
    ctx.mock_login("anna", Role::User).await;
    ctx.mock_catalog(vec![
        product_json(1, "USB-C cable", 9.9, 3),
        product_json(2, "Mouse", 25.0, 5),
    ])
    .await;
    let order_mock = ctx
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/me/orders")
                .header("authorization", "Bearer token-anna")
                .json_body(json!({
                    "description": "ring twice",
                    "products": [
                        { "productId": 1, "orderedQuantity": 3 },
                        { "productId": 2, "orderedQuantity": 1 }
                    ]
                }));
            then.status(201).json_body(order_json(
                501,
                &[(1, 3, 9.9), (2, 1, 25.0)],
                Some("ring twice"),
            ));
        })
        .await;

    let api = ctx.api();
    auth::login(&api, "anna", "secret").await.unwrap();
    let mut shop = Shop::new(StorefrontClient::new(api));
    assert!(shop.can_shop());

    let page = shop.refresh().await.unwrap();
    assert_eq!(page.content.len(), 2);

    // Only three cables are in stock.
    assert_eq!(shop.stage_add(CABLE, 5), 3);
    assert_eq!(shop.stage_add(MOUSE, 1), 1);
    shop.set_note("  ring twice ");
    assert_eq!(shop.cart().unit_count(), 4);

    let order = shop.checkout().await.unwrap();
    order_mock.assert_async().await;
    assert_eq!(order.id_order.as_i64(), 501);
    assert_eq!(order.unit_count(), 4);
    assert!(shop.cart().is_empty());
    assert_eq!(shop.cart().note(), "");
    assert_eq!(shop.cart().status(), Some(ORDER_PLACED_MESSAGE));
}

#[tokio::test]
async fn test_stock_drop_clamps_cart_before_checkout() {
    let ctx = TestContext::start().await;
    ctx.mock_login("anna", Role::User).await;
    let mut catalog = ctx
        .mock_catalog(vec![product_json(1, "USB-C cable", 9.9, 4)])
        .await;

    let api = ctx.api();
    auth::login(&api, "anna", "secret").await.unwrap();
    let mut shop = Shop::new(StorefrontClient::new(api));
    shop.refresh().await.unwrap();
    assert_eq!(shop.stage_add(CABLE, 4), 4);

    // Someone else bought three in the meantime.
    catalog.delete_async().await;
    ctx.mock_catalog(vec![product_json(1, "USB-C cable", 9.9, 1)])
        .await;
    shop.refresh().await.unwrap();
    assert_eq!(shop.cart().quantity(CABLE), 1);

    ctx.server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/me/orders")
                .json_body_partial(r#"{"products":[{"productId":1,"orderedQuantity":1}]}"#);
            then.status(201)
                .json_body(order_json(502, &[(1, 1, 9.9)], None));
        })
        .await;
    let order = shop.checkout().await.unwrap();
    assert_eq!(order.products.len(), 1);
    assert_eq!(order.products[0].ordered_quantity, 1);
}

#[tokio::test]
async fn test_rejected_checkout_keeps_cart() {
    let ctx = TestContext::start().await;
    ctx.mock_login("anna", Role::User).await;
    ctx.mock_catalog(vec![product_json(2, "Mouse", 25.0, 5)])
        .await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/me/orders");
            then.status(409)
                .json_body(json!({ "status": 409, "message": "Insufficient stock for Mouse" }));
        })
        .await;

    let api = ctx.api();
    auth::login(&api, "anna", "secret").await.unwrap();
    let mut shop = Shop::new(StorefrontClient::new(api));
    shop.refresh().await.unwrap();
    shop.stage_add(MOUSE, 2);

    let err = shop.checkout().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Api(_)));
    assert_eq!(shop.cart().quantity(MOUSE), 2);
    assert_eq!(shop.cart().status(), Some("Insufficient stock for Mouse"));
}

#[tokio::test]
async fn test_guest_can_browse_but_not_order() {
    let ctx = TestContext::start().await;
    ctx.mock_catalog(vec![product_json(2, "Mouse", 25.0, 5)])
        .await;

    let api = ctx.api();
    auth::enter_as_guest(&api);
    let mut shop = Shop::new(StorefrontClient::new(api));
    assert!(!shop.can_shop());

    let page = shop.refresh().await.unwrap();
    assert_eq!(page.content[0].stock(), 5);
    assert_eq!(shop.stage_add(MOUSE, 1), 0);
    assert!(matches!(
        shop.checkout().await,
        Err(CheckoutError::NotAllowed)
    ));
}
