//! The signed-in shopper's orders.

use tracing::{info, instrument};
use vetrina_client::ApiError;
use vetrina_core::{CreateOrderRequest, Order, OrderId, Page};

use crate::client::StorefrontClient;

/// Newest orders first.
pub const MY_ORDERS_SORT: &str = "dateTime,desc";

impl StorefrontClient {
    /// One page of the shopper's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails (401 when not signed in).
    #[instrument(skip(self))]
    pub async fn my_orders(&self, page: u32, size: u32) -> Result<Page<Order>, ApiError> {
        self.api()
            .get_json_with(
                "/api/me/orders",
                &[
                    ("page", page.to_string()),
                    ("size", size.to_string()),
                    ("sort", MY_ORDERS_SORT.to_string()),
                ],
            )
            .await
    }

    /// A single order of the shopper's.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` (404 if the order is not the shopper's).
    #[instrument(skip(self))]
    pub async fn my_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.api().get_json(&format!("/api/me/orders/{id}")).await
    }

    /// Place an order. Prefer [`Shop::checkout`](crate::Shop::checkout),
    /// which builds the request from the cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the order (for example
    /// because stock ran out since the last catalog refresh).
    #[instrument(skip(self, request), fields(lines = request.products.len()))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        let order: Order = self.api().post_json("/api/me/orders", request).await?;
        info!(order_id = %order.id_order, "Order created");
        Ok(order)
    }
}
