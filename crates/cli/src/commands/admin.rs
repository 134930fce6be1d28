//! Admin console commands.
//!
//! # Usage
//!
//! ```bash
//! # Orders placed by a customer in March
//! vetrina admin orders --customer rossi --from 2025-03-01 --to 2025-03-31
//!
//! # Remove three units of product 7
//! vetrina admin stock 7 --remove 3
//!
//! # Keep the alerts board on screen
//! vetrina admin alerts --follow
//!
//! # 20% off two products for a week
//! vetrina admin create-promotion --name Spring --from 2025-04-01 --to 2025-04-07 \
//!     --item 7=20 --item 12=20
//! ```
//!
//! Every command signs in with `VETRINA_USERNAME` / `VETRINA_PASSWORD`, which
//! must belong to an `ADMIN` account.

use clap::Subcommand;
use chrono::{Local, NaiveDate};
use vetrina_admin::alerts::{BADGE_POLL_INTERVAL, BOARD_POLL_INTERVAL};
use vetrina_admin::promotions::{archived_page, split_archived};
use vetrina_admin::{
    AdminClient, DateRange, OrderFilters, OrderPeriod, ProductFieldError, ProductForm, PromotionDraft,
    StatsPeriod, StockChange, StockMode,
};
use vetrina_core::{AlertId, OrderId, ProductCategory, ProductId, ProductQuery, PromotionId};

use super::Context;
use super::args::{parse_category, parse_day, parse_promotion_item};
use crate::output;

#[derive(Subcommand)]
pub enum AdminCommand {
    /// List orders, newest first, optionally filtered
    Orders {
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        city: Option<String>,
        /// First day (YYYY-MM-DD or dd/mm/yyyy)
        #[arg(long, value_parser = parse_day)]
        from: Option<NaiveDate>,
        /// Last day, inclusive
        #[arg(long, value_parser = parse_day)]
        to: Option<NaiveDate>,
        /// DAY, WEEK or MONTH; ignored when --from or --to is given
        #[arg(long)]
        period: Option<OrderPeriod>,
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// Delete an order
    DeleteOrder { id: i64 },
    /// List products
    Products {
        #[arg(short, long, default_value = "")]
        q: String,
        #[arg(short, long, value_parser = parse_category)]
        category: Option<ProductCategory>,
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },
    /// Show one product
    Product { id: i64 },
    /// Create a product
    CreateProduct {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Update a product; omitted fields keep their current value
    UpdateProduct {
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    DeleteProduct { id: i64 },
    /// Add or remove stock
    Stock {
        id: i64,
        /// Units to add
        #[arg(long, conflicts_with = "remove", required_unless_present = "remove")]
        add: Option<String>,
        /// Units to remove
        #[arg(long)]
        remove: Option<String>,
    },
    /// Top and least selling products
    Stats {
        /// 3, 5 or 10
        #[arg(short, long, default_value_t = vetrina_admin::products::DEFAULT_STATS_LIMIT)]
        limit: u32,
        /// all, 7 or 30
        #[arg(long, default_value = "all")]
        period: StatsPeriod,
    },
    /// List open low-stock alerts
    Alerts {
        /// Keep reloading the board until Ctrl-C
        #[arg(long)]
        follow: bool,
    },
    /// Acknowledge an alert
    Ack { id: i64 },
    /// List promotions
    Promotions {
        /// Also list archived promotions
        #[arg(long)]
        archived: bool,
        /// Page of the archived list
        #[arg(long, default_value_t = 0)]
        archived_page: usize,
    },
    /// Create a promotion
    CreatePromotion {
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = parse_day)]
        from: Option<NaiveDate>,
        #[arg(long, value_parser = parse_day)]
        to: Option<NaiveDate>,
        /// Create it switched off
        #[arg(long)]
        inactive: bool,
        /// `PRODUCT_ID=PERCENT`, repeatable
        #[arg(short, long = "item", value_parser = parse_promotion_item)]
        items: Vec<(i64, String)>,
    },
    /// Switch a promotion on or off
    TogglePromotion { id: i64 },
    /// Archive a promotion
    ArchivePromotion { id: i64 },
}

#[derive(clap::Args)]
pub struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    /// Price in euro, e.g. `1.299,50` or `1299.50`
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    quantity: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long, value_parser = parse_category)]
    category: Option<ProductCategory>,
}

impl ProductFields {
    fn apply(self, form: &mut ProductForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(quantity) = self.quantity {
            form.quantity = quantity;
        }
        if let Some(image_url) = self.image_url {
            form.image_url = image_url;
        }
        if self.category.is_some() {
            form.category = self.category;
        }
    }
}

fn field_errors(errors: &[ProductFieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reprint the board whenever a reload lands; the badge count is refreshed on
/// its own, slower timer.
async fn follow_alerts(admin: &AdminClient) {
    let (_board_poller, mut board) = admin.poll_alerts(BOARD_POLL_INTERVAL);
    let _badge_poller = admin.poll_badge(BADGE_POLL_INTERVAL);
    let mut badge = admin.badge().subscribe();

    loop {
        tokio::select! {
            changed = board.changed() => {
                if changed.is_err() {
                    return;
                }
                let alerts = board.borrow_and_update().clone();
                output::emit(&output::alerts(&alerts));
            }
            changed = badge.changed() => {
                if changed.is_err() {
                    return;
                }
                let open = *badge.borrow_and_update();
                output::emit(&format!("Open alerts: {open}"));
            }
            _ = tokio::signal::ctrl_c() => return,
        }
    }
}

pub async fn run(ctx: &Context, command: AdminCommand) -> Result<(), Box<dyn std::error::Error>> {
    ctx.sign_in().await?;
    if !ctx.api().session().snapshot().is_admin() {
        return Err("This account is not an ADMIN.".into());
    }
    let admin = ctx.admin();

    match command {
        AdminCommand::Orders {
            customer,
            product,
            city,
            from,
            to,
            period,
            page,
        } => {
            let mut filters = OrderFilters::default();
            filters.customer = customer.unwrap_or_default();
            filters.product = product.unwrap_or_default();
            filters.city = city.unwrap_or_default();
            filters.set_period(period);
            filters.set_range(DateRange::new(from, to));
            let mut search = filters.apply()?;
            search.page = page;
            let orders = admin
                .search_orders(&search)
                .await
                .map_err(|e| e.user_message("Failed to load orders"))?;
            output::emit(&output::orders(&orders));
        }
        AdminCommand::DeleteOrder { id } => {
            admin
                .delete_order(OrderId::new(id))
                .await
                .map_err(|e| e.user_message("Failed to delete order"))?;
            output::emit(&format!("Order #{id} deleted."));
        }
        AdminCommand::Products { q, category, page } => {
            let query = ProductQuery {
                q,
                category,
                page,
                ..ProductQuery::default()
            };
            let products = admin
                .products(&query)
                .await
                .map_err(|e| e.user_message("Failed to load products"))?;
            let heading = ProductCategory::heading(query.category.as_ref());
            output::emit(&output::products(heading, &products));
        }
        AdminCommand::Product { id } => {
            let product = admin
                .product(ProductId::new(id))
                .await
                .map_err(|e| e.user_message("Failed to load product"))?;
            output::emit(&output::product_line(&product));
        }
        AdminCommand::CreateProduct { fields } => {
            let mut form = ProductForm::default();
            fields.apply(&mut form);
            let request = form.to_create_request().map_err(|e| field_errors(&e))?;
            let product = admin
                .create_product(&request)
                .await
                .map_err(|e| e.user_message("Failed to create product"))?;
            output::emit(&output::product_line(&product));
        }
        AdminCommand::UpdateProduct { id, fields } => {
            let id = ProductId::new(id);
            let current = admin
                .product(id)
                .await
                .map_err(|e| e.user_message("Failed to load product"))?;
            let mut form = ProductForm::from_product(&current);
            fields.apply(&mut form);
            let request = form.to_update_request().map_err(|e| field_errors(&e))?;
            let product = admin
                .update_product(id, &request)
                .await
                .map_err(|e| e.user_message("Failed to update product"))?;
            output::emit(&output::product_line(&product));
        }
        AdminCommand::DeleteProduct { id } => {
            admin
                .delete_product(ProductId::new(id))
                .await
                .map_err(|e| e.user_message("Failed to delete product"))?;
            output::emit(&format!("Product #{id} deleted."));
        }
        AdminCommand::Stock { id, add, remove } => {
            let id = ProductId::new(id);
            let (mode, raw) = match (add, remove) {
                (Some(raw), _) => (StockMode::Add, raw),
                (None, Some(raw)) => (StockMode::Remove, raw),
                (None, None) => return Err("Pass --add or --remove.".into()),
            };
            let product = admin
                .product(id)
                .await
                .map_err(|e| e.user_message("Failed to load product"))?;
            let change = StockChange::parse(mode, &raw, product.quantity)?;
            let updated = admin
                .restock(id, change.delta)
                .await
                .map_err(|e| e.user_message("Stock update failed"))?;
            if let Err(e) = admin.refresh_alert_count().await {
                tracing::warn!(error = %e, "Alert count refresh failed");
            }
            output::emit(&change.message(id));
            output::emit(&output::product_line(&updated));
        }
        AdminCommand::Stats { limit, period } => {
            let stats = admin
                .sales_stats(limit, period)
                .await
                .map_err(|e| e.user_message("Failed to load stats"))?;
            output::emit(&output::stats(&stats));
        }
        AdminCommand::Alerts { follow: false } => {
            let alerts = admin
                .open_alerts()
                .await
                .map_err(|e| e.user_message("Failed to load alerts"))?;
            output::emit(&output::alerts(&alerts));
        }
        AdminCommand::Alerts { follow: true } => follow_alerts(admin).await,
        AdminCommand::Ack { id } => {
            let (acked, open) = admin
                .ack_alert(AlertId::new(id))
                .await
                .map_err(|e| e.user_message("Failed to acknowledge alert"))?;
            output::emit(&format!("Alert #{} acknowledged.", acked.id));
            output::emit(&output::alerts(&open));
        }
        AdminCommand::Promotions {
            archived,
            archived_page: page,
        } => {
            let promotions = admin
                .promotions(archived)
                .await
                .map_err(|e| e.user_message("Failed to load promotions"))?;
            let now = Local::now().naive_local();
            let (standard, archived_list) = split_archived(promotions);
            if standard.is_empty() {
                output::emit("No promotions");
            }
            for p in &standard {
                output::emit(&output::promotion(p, now));
            }
            if archived {
                let (shown, pages) = archived_page(&archived_list, page);
                output::emit(&format!("Archived (page {}/{})", page + 1, pages.max(1)));
                for p in shown {
                    output::emit(&output::promotion(p, now));
                }
            }
        }
        AdminCommand::CreatePromotion {
            name,
            from,
            to,
            inactive,
            items,
        } => {
            let mut draft = PromotionDraft::default();
            draft.name = name;
            draft.active = !inactive;
            draft.range = DateRange::new(from, to);
            for (id, discount) in items {
                let id = ProductId::new(id);
                if !draft.is_selected(id) {
                    draft.toggle_product(id);
                }
                draft.set_discount(id, discount);
            }
            let request = draft.to_request()?;
            let promotion = admin
                .create_promotion(&request)
                .await
                .map_err(|e| e.user_message("Failed to create promotion"))?;
            output::emit(&output::promotion(&promotion, Local::now().naive_local()));
        }
        AdminCommand::TogglePromotion { id } => {
            let current = admin
                .promotion(PromotionId::new(id))
                .await
                .map_err(|e| e.user_message("Failed to load promotion"))?;
            let promotion = admin
                .toggle_promotion(&current)
                .await
                .map_err(|e| e.user_message("Failed to update promotion"))?;
            output::emit(&output::promotion(&promotion, Local::now().naive_local()));
        }
        AdminCommand::ArchivePromotion { id } => {
            let promotion = admin
                .archive_promotion(PromotionId::new(id))
                .await
                .map_err(|e| e.user_message("Failed to archive promotion"))?;
            output::emit(&format!("Promotion #{} archived.", promotion.id));
        }
    }
    Ok(())
}
