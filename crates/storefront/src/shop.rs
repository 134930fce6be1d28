//! Shop controller: catalog query state, role gating and checkout.

use tracing::{debug, info, instrument, warn};
use vetrina_client::ApiError;
use vetrina_core::{Order, Page, Product, ProductCategory, ProductId};

use crate::cart::Cart;
use crate::catalog::ProductQuery;
use crate::client::StorefrontClient;
use crate::error::CheckoutError;

/// Status shown after a successful checkout.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed! Open \"My orders\" to review it.";

/// The shop screen's state.
///
/// Only a signed-in `USER` may hold a cart. Every cart mutation below is a
/// no-op for anyone else, and the cart is discarded as soon as the session
/// stops being a shopper.
#[derive(Debug)]
pub struct Shop {
    client: StorefrontClient,
    query: ProductQuery,
    page: Option<Page<Product>>,
    categories: Vec<ProductCategory>,
    cart: Cart,
    can_shop: bool,
}

impl Shop {
    /// Open the shop with the default query (first page, sorted by name).
    #[must_use]
    pub fn new(client: StorefrontClient) -> Self {
        let can_shop = client.api().session().snapshot().can_shop();
        Self {
            client,
            query: ProductQuery::default(),
            page: None,
            categories: Vec::new(),
            cart: Cart::new(),
            can_shop,
        }
    }

    /// Re-read the session role. Returns whether the user may shop.
    pub fn sync_session(&mut self) -> bool {
        let can_shop = self.client.api().session().snapshot().can_shop();
        if !can_shop && (self.can_shop || !self.cart.is_empty()) {
            debug!("Session cannot shop; discarding cart");
            self.cart.discard();
        }
        self.can_shop = can_shop;
        can_shop
    }

    #[must_use]
    pub const fn can_shop(&self) -> bool {
        self.can_shop
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn query(&self) -> &ProductQuery {
        &self.query
    }

    /// Last page loaded, if any.
    #[must_use]
    pub const fn page(&self) -> Option<&Page<Product>> {
        self.page.as_ref()
    }

    #[must_use]
    pub fn categories(&self) -> &[ProductCategory] {
        &self.categories
    }

    /// Heading for the current category filter.
    #[must_use]
    pub fn title(&self) -> &str {
        ProductCategory::heading(self.query.category.as_ref())
    }

    // =========================================================================
    // Query
    // =========================================================================

    /// Change the search text and go back to the first page.
    pub fn set_query(&mut self, q: impl Into<String>) {
        self.query.q = q.into();
        self.query.page = 0;
    }

    /// Change the category filter and go back to the first page.
    pub fn set_category(&mut self, category: Option<ProductCategory>) {
        self.query.category = category;
        self.query.page = 0;
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.page = page;
    }

    /// Load the category list. A failure leaves an empty list.
    pub async fn load_categories(&mut self) -> &[ProductCategory] {
        self.categories = match self.client.categories().await {
            Ok(categories) => categories,
            Err(e) => {
                warn!(error = %e, "Failed to load categories");
                Vec::new()
            }
        };
        &self.categories
    }

    /// Fetch the current page and reconcile the cart against it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the page cannot be fetched; the cart is left
    /// untouched.
    #[instrument(skip(self), fields(q = %self.query.q, page = self.query.page))]
    pub async fn refresh(&mut self) -> Result<&Page<Product>, ApiError> {
        self.sync_session();
        let page = self.client.products(&self.query).await?;

        if self.can_shop {
            let clamps = self.cart.reconcile(&page.content);
            if !clamps.is_empty() {
                info!(count = clamps.len(), "Cart adjusted to current stock");
            }
        } else {
            self.cart.remember(&page.content);
        }

        Ok(self.page.insert(page))
    }

    // =========================================================================
    // Cart (shoppers only)
    // =========================================================================

    /// See [`Cart::stage_add`]. Returns 0 for non-shoppers.
    pub fn stage_add(&mut self, product_id: ProductId, requested: u32) -> u32 {
        if !self.sync_session() {
            return 0;
        }
        self.cart.stage_add(product_id, requested)
    }

    /// See [`Cart::add_pick`]. Returns 0 for non-shoppers.
    pub fn add_pick(&mut self, product_id: ProductId) -> u32 {
        if !self.sync_session() {
            return 0;
        }
        self.cart.add_pick(product_id)
    }

    /// See [`Cart::increment`].
    pub fn increment(&mut self, product_id: ProductId) -> bool {
        self.sync_session() && self.cart.increment(product_id)
    }

    /// See [`Cart::decrement`].
    pub fn decrement(&mut self, product_id: ProductId) -> bool {
        self.sync_session() && self.cart.decrement(product_id)
    }

    /// See [`Cart::set_pick`].
    pub fn set_pick(&mut self, product_id: ProductId, value: u32) -> u32 {
        if !self.sync_session() {
            return 0;
        }
        self.cart.set_pick(product_id, value)
    }

    /// See [`Cart::increment_pick`].
    pub fn increment_pick(&mut self, product_id: ProductId) -> u32 {
        if !self.sync_session() {
            return 0;
        }
        self.cart.increment_pick(product_id)
    }

    /// See [`Cart::decrement_pick`].
    pub fn decrement_pick(&mut self, product_id: ProductId) -> u32 {
        if !self.sync_session() {
            return 0;
        }
        self.cart.decrement_pick(product_id)
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        if self.sync_session() {
            self.cart.set_note(note);
        }
    }

    /// Empty cart, note and status.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Place an order for the whole cart.
    ///
    /// An empty cart fails without any request. On success the cart and
    /// note are cleared, a success status is recorded and the catalog is
    /// reloaded from the first page (a failure of that reload is ignored).
    /// On failure the cart is left as it was and the status carries the
    /// server's message.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotAllowed` for non-shoppers,
    /// `CheckoutError::EmptyCart` for an empty cart, and
    /// `CheckoutError::Api` when the backend rejects the order.
    #[instrument(skip(self), fields(lines = self.cart.lines().len()))]
    pub async fn checkout(&mut self) -> Result<Order, CheckoutError> {
        if !self.sync_session() {
            return Err(CheckoutError::NotAllowed);
        }

        self.cart.clear_status();
        let Some(request) = self.cart.to_order_request() else {
            let err = CheckoutError::EmptyCart;
            self.cart.set_status(err.to_string());
            return Err(err);
        };

        let order = match self.client.create_order(&request).await {
            Ok(order) => order,
            Err(e) => {
                let err = CheckoutError::Api(e);
                self.cart.set_status(err.to_string());
                return Err(err);
            }
        };

        info!(order_id = %order.id_order, units = order.unit_count(), "Order placed");
        self.cart.clear();
        self.cart.set_status(ORDER_PLACED_MESSAGE);

        self.query.page = 0;
        if let Err(e) = self.refresh().await {
            debug!(error = %e, "Catalog reload after checkout failed");
        }

        Ok(order)
    }
}
