//! Admin workflows against a mocked backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::json;
use vetrina_admin::{
    AdminClient, DateRange, OrderFilters, OrderPeriod, PromotionDraft, StockAdjustmentError,
    StockChange, StockMode,
};
use vetrina_client::auth;
use vetrina_core::{AlertId, ProductId, Role};
use vetrina_integration_tests::{TestContext, order_json, page_json, product_json};

async fn signed_in_admin(ctx: &TestContext) -> AdminClient {
    ctx.mock_login("boss", Role::Admin).await;
    let api = ctx.api();
    auth::login(&api, "boss", "secret").await.unwrap();
    assert!(api.session().snapshot().is_admin());
    AdminClient::new(api)
}

fn alert_json(id: i64, product_id: i64, quantity: i32, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "productId": product_id,
        "productName": format!("Product {product_id}"),
        "currentQuantity": quantity,
        "threshold": 3,
        "status": status,
        "createdAt": "2025-03-14T10:15:00"
    })
}

#[tokio::test]
async fn test_remove_stock_then_refresh_badge() {
    let ctx = TestContext::start().await;
    let admin = signed_in_admin(&ctx).await;

    ctx.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/products/7");
            then.status(200).json_body(product_json(7, "Keyboard", 49.0, 2));
        })
        .await;
    let restock = ctx
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/admin/products/7/restock")
                .json_body(json!({ "addQuantity": -2 }));
            then.status(200).json_body(product_json(7, "Keyboard", 49.0, 0));
        })
        .await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/alerts/open/count");
            then.status(200).json_body(json!(1));
        })
        .await;

    let id = ProductId::new(7);
    let product = admin.product(id).await.unwrap();

    // Taking three out of two is refused before anything is sent.
    assert_eq!(
        StockChange::parse(StockMode::Remove, "3", product.quantity),
        Err(StockAdjustmentError::BelowZero { current: 2 })
    );

    let change = StockChange::parse(StockMode::Remove, "2", product.quantity).unwrap();
    let updated = admin.restock(id, change.delta).await.unwrap();
    restock.assert_hits_async(1).await;
    assert_eq!(updated.stock(), 0);
    assert_eq!(change.message(id), "Stock decreased by 2 for #7.");

    let mut badge = admin.badge().subscribe();
    assert_eq!(admin.refresh_alert_count().await.unwrap(), 1);
    assert!(badge.has_changed().unwrap());
    assert_eq!(*badge.borrow_and_update(), 1);
}

#[tokio::test]
async fn test_ack_alert_reloads_open_list() {
    let ctx = TestContext::start().await;
    let admin = signed_in_admin(&ctx).await;

    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/admin/alerts/4/ack");
            then.status(200).json_body(alert_json(4, 7, 0, "ACKED"));
        })
        .await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admin/alerts");
            then.status(200)
                .json_body(json!([alert_json(5, 9, 1, "OPEN")]));
        })
        .await;

    admin.badge().set(2);
    let (acked, open) = admin.ack_alert(AlertId::new(4)).await.unwrap();
    assert!(!acked.is_open());
    assert_eq!(open.len(), 1);
    assert_eq!(admin.badge().get(), 1);
}

#[tokio::test]
async fn test_order_search_sends_range_not_period() {
    let ctx = TestContext::start().await;
    let admin = signed_in_admin(&ctx).await;

    let search_mock = ctx
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/admin/orders/search")
                .query_param("customer", "rossi")
                .query_param("from", "2025-03-01T00:00")
                .query_param("to", "2025-03-31T23:59")
                .query_param("sort", "dateTime,desc");
            then.status(200)
                .json_body(page_json(vec![order_json(501, &[(1, 2, 9.9)], None)]));
        })
        .await;

    let mut filters = OrderFilters::default();
    filters.customer = "  rossi ".to_string();
    filters.set_period(Some(OrderPeriod::Week));
    filters.set_range(DateRange::new(
        NaiveDate::from_ymd_opt(2025, 3, 1),
        NaiveDate::from_ymd_opt(2025, 3, 31),
    ));
    assert_eq!(filters.period(), None);

    let search = filters.apply().unwrap();
    assert!(!search.params().iter().any(|(key, _)| *key == "period"));

    let orders = admin.search_orders(&search).await.unwrap();
    search_mock.assert_async().await;
    assert_eq!(orders.content.len(), 1);
    assert_eq!(orders.content[0].customer_name(), "Anna Rossi");
}

#[tokio::test]
async fn test_create_then_toggle_promotion() {
    let ctx = TestContext::start().await;
    let admin = signed_in_admin(&ctx).await;

    let promotion = json!({
        "id": 12,
        "name": "Spring",
        "startsAt": "2025-04-01T00:00",
        "endsAt": "2025-04-07T23:59",
        "active": true,
        "archived": false,
        "items": [
            { "productId": 7, "productName": "Keyboard", "discountPercent": 20 }
        ]
    });
    let create = ctx
        .server
        .mock_async({
            let promotion = promotion.clone();
            move |when, then| {
                when.method(POST)
                    .path("/api/admin/promotions")
                    .json_body(json!({
                        "name": "Spring",
                        "startsAt": "2025-04-01T00:00",
                        "endsAt": "2025-04-07T23:59",
                        "active": true,
                        "items": [{ "productId": 7, "discountPercent": 20 }]
                    }));
                then.status(201).json_body(promotion);
            }
        })
        .await;
    let mut switched_off = promotion;
    switched_off["active"] = json!(false);
    let toggle = ctx
        .server
        .mock_async(move |when, then| {
            when.method(PUT)
                .path("/api/admin/promotions/12")
                .json_body_partial(r#"{"active":false}"#);
            then.status(200).json_body(switched_off);
        })
        .await;

    let mut draft = PromotionDraft::default();
    draft.name = " Spring ".to_string();
    draft.range = DateRange::new(
        NaiveDate::from_ymd_opt(2025, 4, 1),
        NaiveDate::from_ymd_opt(2025, 4, 7),
    );
    draft.toggle_product(ProductId::new(7));
    draft.set_discount(ProductId::new(7), "20");
    // Out of range; dropped from the request.
    draft.toggle_product(ProductId::new(8));
    draft.set_discount(ProductId::new(8), "95");

    let created = admin
        .create_promotion(&draft.to_request().unwrap())
        .await
        .unwrap();
    create.assert_async().await;
    assert!(created.active);

    let toggled = admin.toggle_promotion(&created).await.unwrap();
    toggle.assert_async().await;
    assert!(!toggled.active);
}
