//! Cart/inventory reconciliation.
//!
//! The cart can never hold more units of a product than the backend last
//! reported as available. There is no server-side reservation: every bound
//! comes from the locally cached product snapshots, and every fresh catalog
//! page is used to clamp cart quantities down (never up).
//!
//! Invariants, for every product `p`:
//!
//! - `0 < quantity(p) <= stock(p)` for every line present (zero lines are
//!   removed, not kept)
//! - `0 <= pick(p) <= stock(p) - quantity(p)`

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use vetrina_core::{CreateOrderRequest, OrderLine, Product, ProductId};

/// A cart quantity lowered because fresh stock no longer covered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamp {
    pub product_id: ProductId,
    pub from: u32,
    /// `0` means the line was removed.
    pub to: u32,
}

/// One cart line, joined with the cached product snapshot if there is one.
#[derive(Debug, Clone, Copy)]
pub struct CartLine<'a> {
    pub product_id: ProductId,
    pub quantity: u32,
    pub product: Option<&'a Product>,
}

impl CartLine<'_> {
    /// Product name, empty when the product is not cached.
    #[must_use]
    pub fn name(&self) -> &str {
        self.product.map_or("", |p| p.name.as_str())
    }

    /// Effective unit price, zero when the product is not cached.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.product.map_or(Decimal::ZERO, Product::unit_price)
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }
}

/// Cart, pending picks, product snapshots, order note and status message.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: BTreeMap<ProductId, u32>,
    picks: HashMap<ProductId, u32>,
    products: HashMap<ProductId, Product>,
    note: String,
    status: Option<String>,
}

impl Cart {
    /// An empty cart with no cached products.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Cached stock for a product, if the product has been seen.
    #[must_use]
    pub fn stock_of(&self, product_id: ProductId) -> Option<u32> {
        self.products.get(&product_id).map(Product::stock)
    }

    /// Cached snapshot of a product.
    #[must_use]
    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.products.get(&product_id)
    }

    /// Units of a product in the cart.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.lines.get(&product_id).copied().unwrap_or(0)
    }

    /// Units that can still be added. Zero for unknown products.
    #[must_use]
    pub fn remaining(&self, product_id: ProductId) -> u32 {
        self.stock_of(product_id)
            .unwrap_or(0)
            .saturating_sub(self.quantity(product_id))
    }

    /// Staged pick for a product, bounded by what can still be added.
    #[must_use]
    pub fn pick(&self, product_id: ProductId) -> u32 {
        self.picks
            .get(&product_id)
            .copied()
            .unwrap_or(0)
            .min(self.remaining(product_id))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.lines.values().map(|&q| u64::from(q)).sum()
    }

    /// Lines sorted by cached product name, then id.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine<'_>> {
        let mut lines: Vec<CartLine<'_>> = self
            .lines
            .iter()
            .map(|(&product_id, &quantity)| CartLine {
                product_id,
                quantity,
                product: self.products.get(&product_id),
            })
            .collect();
        lines.sort_by(|a, b| a.name().cmp(b.name()).then(a.product_id.cmp(&b.product_id)));
        lines
    }

    /// Σ `(discounted price or price) × quantity` over the cart. Products
    /// missing from the cache count as zero.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|(product_id, &quantity)| match self.products.get(product_id) {
                Some(product) => product.unit_price() * Decimal::from(quantity),
                None => {
                    tracing::warn!(
                        product_id = %product_id,
                        quantity,
                        "Cart line has no cached product; counted as zero"
                    );
                    Decimal::ZERO
                }
            })
            .sum()
    }

    /// Order note as typed.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Last checkout status message.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    // =========================================================================
    // Cart mutations
    // =========================================================================

    /// Add up to `requested` units, clamped to what stock still allows.
    ///
    /// Returns the number of units actually added. When that is zero the
    /// cart and pick are left as they were; otherwise the pick resets to 0.
    /// Always clears the status message.
    pub fn stage_add(&mut self, product_id: ProductId, requested: u32) -> u32 {
        self.status = None;

        let added = requested.min(self.remaining(product_id));
        if added == 0 {
            return 0;
        }

        *self.lines.entry(product_id).or_insert(0) += added;
        self.picks.insert(product_id, 0);
        added
    }

    /// Add the currently staged pick.
    pub fn add_pick(&mut self, product_id: ProductId) -> u32 {
        let pick = self.pick(product_id);
        self.stage_add(product_id, pick)
    }

    /// Add one unit. No-op at the cached stock figure; a product that is not
    /// cached is bounded by its current quantity, so nothing is added.
    ///
    /// Returns whether the cart changed. Always clears the status message.
    pub fn increment(&mut self, product_id: ProductId) -> bool {
        self.status = None;

        let current = self.quantity(product_id);
        let max = self.stock_of(product_id).unwrap_or(current);
        if current >= max {
            return false;
        }
        self.lines.insert(product_id, current + 1);
        true
    }

    /// Remove one unit, dropping the line at zero.
    ///
    /// Returns whether the cart changed. Always clears the status message.
    pub fn decrement(&mut self, product_id: ProductId) -> bool {
        self.status = None;

        match self.lines.get(&product_id).copied() {
            None | Some(0) => false,
            Some(1) => {
                self.lines.remove(&product_id);
                true
            }
            Some(current) => {
                self.lines.insert(product_id, current - 1);
                true
            }
        }
    }

    /// Empty the cart, the note and the status message. Picks and cached
    /// products are kept.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.note.clear();
        self.status = None;
    }

    /// Drop everything the shopper staged: cart, picks, note and status.
    pub fn discard(&mut self) {
        self.clear();
        self.picks.clear();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // =========================================================================
    // Picks
    // =========================================================================

    /// Set the pick, clamped to `[0, remaining]`. Returns the stored value.
    pub fn set_pick(&mut self, product_id: ProductId, value: u32) -> u32 {
        let value = value.min(self.remaining(product_id));
        self.picks.insert(product_id, value);
        value
    }

    /// Raise the pick by one, up to what can still be added.
    pub fn increment_pick(&mut self, product_id: ProductId) -> u32 {
        let next = self.pick(product_id).saturating_add(1);
        self.set_pick(product_id, next)
    }

    /// Lower the pick by one, down to zero.
    pub fn decrement_pick(&mut self, product_id: ProductId) -> u32 {
        let next = self.pick(product_id).saturating_sub(1);
        self.set_pick(product_id, next)
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Merge a page into the product cache without touching cart or picks.
    pub fn remember(&mut self, products: &[Product]) {
        for product in products {
            self.products.insert(product.product_id, product.clone());
        }
    }

    /// Apply a freshly fetched catalog page.
    ///
    /// Updates the cache, gives every product on the page a pick entry
    /// (0 if it had none), and clamps any cart quantity above the fresh
    /// stock down to it, removing lines clamped to zero. Quantities are
    /// never raised. Returns the clamps applied.
    pub fn reconcile(&mut self, products: &[Product]) -> Vec<Clamp> {
        self.remember(products);

        let mut clamps = Vec::new();
        for product in products {
            let id = product.product_id;
            let stock = product.stock();

            if let Some(&current) = self.lines.get(&id)
                && current > stock
            {
                if stock == 0 {
                    self.lines.remove(&id);
                } else {
                    self.lines.insert(id, stock);
                }
                tracing::warn!(
                    product_id = %id,
                    from = current,
                    to = stock,
                    "Cart quantity clamped to fresh stock"
                );
                clamps.push(Clamp {
                    product_id: id,
                    from: current,
                    to: stock,
                });
            }

            let remaining = stock.saturating_sub(self.quantity(id));
            let pick = self.picks.entry(id).or_insert(0);
            *pick = (*pick).min(remaining);
        }
        clamps
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Order body for the current cart: every line, in display order, with
    /// the note trimmed (blank becomes `null`). `None` when the cart is empty.
    #[must_use]
    pub fn to_order_request(&self) -> Option<CreateOrderRequest> {
        if self.is_empty() {
            return None;
        }

        let note = self.note.trim();
        Some(CreateOrderRequest {
            description: (!note.is_empty()).then(|| note.to_string()),
            products: self
                .lines()
                .into_iter()
                .map(|line| OrderLine {
                    product_id: line.product_id,
                    ordered_quantity: line.quantity,
                })
                .collect(),
        })
    }
}
