//! Catalog browsing and checkout.

use std::collections::BTreeMap;

use tracing::{info, warn};
use vetrina_core::{ProductCategory, ProductId, ProductQuery};
use vetrina_storefront::Shop;

use super::Context;
use crate::output;

/// Catalog pages walked while looking for the products of an order.
const MAX_CATALOG_PAGES: u32 = 50;

pub async fn categories(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.browse_as_guest();
    let categories = ctx
        .storefront()
        .categories()
        .await
        .map_err(|e| e.user_message("Failed to load categories"))?;
    let lines: Vec<String> = categories
        .iter()
        .map(|c| format!("{:<22} {}", c.code(), c.title()))
        .collect();
    output::emit(&lines.join("\n"));
    Ok(())
}

pub async fn catalog(
    ctx: &Context,
    q: String,
    category: Option<ProductCategory>,
    page: u32,
    size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.browse_as_guest();
    let query = ProductQuery {
        q,
        category,
        page,
        size,
        ..ProductQuery::default()
    };
    let products = ctx
        .storefront()
        .products(&query)
        .await
        .map_err(|e| e.user_message("Failed to load products"))?;
    let heading = ProductCategory::heading(query.category.as_ref());
    output::emit(&output::products(heading, &products));
    Ok(())
}

/// Sum repeated product IDs into one requested quantity each.
fn merge_lines(lines: &[(i64, u32)]) -> BTreeMap<ProductId, u32> {
    let mut pending: BTreeMap<ProductId, u32> = BTreeMap::new();
    for (id, quantity) in lines {
        let total = pending.entry(ProductId::new(*id)).or_default();
        *total = total.saturating_add(*quantity);
    }
    pending
}

/// Sign in, stage every requested line against current stock and check out.
pub async fn order(
    ctx: &Context,
    lines: &[(i64, u32)],
    note: Option<String>,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.sign_in().await?;

    let mut shop = Shop::new(ctx.storefront().clone());
    if !shop.can_shop() {
        return Err("Only a signed-in USER can place orders.".into());
    }

    let mut pending = merge_lines(lines);

    let mut page = 0;
    while !pending.is_empty() && page < MAX_CATALOG_PAGES {
        shop.set_page(page);
        let catalog = shop
            .refresh()
            .await
            .map_err(|e| e.user_message("Failed to load products"))?;
        let last = catalog.last;
        let found: Vec<ProductId> = catalog
            .content
            .iter()
            .map(|p| p.product_id)
            .filter(|id| pending.contains_key(id))
            .collect();

        for id in found {
            let requested = pending.remove(&id).unwrap_or_default();
            let added = shop.stage_add(id, requested);
            if added < requested {
                warn!(product_id = %id, requested, added, "Not enough stock; quantity reduced");
            }
        }

        if last {
            break;
        }
        page += 1;
    }

    for id in pending.keys() {
        warn!(product_id = %id, "Product not found in the catalog; skipped");
    }
    if let Some(note) = note {
        shop.set_note(note);
    }

    output::emit(&output::cart(shop.cart()));
    if dry_run {
        return Ok(());
    }

    match shop.checkout().await {
        Ok(order) => {
            info!(order_id = %order.id_order, "Checkout complete");
            output::emit(shop.cart().status().unwrap_or_default());
            output::emit(&output::order(&order));
            Ok(())
        }
        Err(e) => Err(e.to_string().into()),
    }
}
