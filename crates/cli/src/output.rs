//! Plain-text rendering of command results.
//!
//! Formatting is pure so it can be tested; [`emit`] is the only place that
//! writes to stdout.

use std::fmt::Write as _;

use vetrina_admin::{Dashboard, SalesStats};
use vetrina_core::{
    Order, Page, Product, Profile, Promotion, StockAlert, format_euro, types::local_time,
};
use vetrina_storefront::Cart;

/// Write a rendered block to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{}", text.trim_end());
}

fn page_footer<T>(page: &Page<T>) -> String {
    format!(
        "page {}/{} ({} total)",
        page.display_number(),
        page.total_pages.max(1),
        page.total_elements
    )
}

pub fn product_line(product: &Product) -> String {
    let price = if product.promo_on() {
        format!(
            "{} (was {}, {})",
            format_euro(product.unit_price()),
            format_euro(product.list_price()),
            product.promo_name.as_deref().unwrap_or("promo")
        )
    } else {
        format_euro(product.unit_price())
    };
    format!(
        "#{:<5} {:<32} {:>14}  stock {:>4}  [{}]",
        product.product_id,
        product.name,
        price,
        product.stock(),
        product.category.code()
    )
}

pub fn products(heading: &str, page: &Page<Product>) -> String {
    let mut out = format!("{heading}\n");
    if page.content.is_empty() {
        out.push_str("(no products)\n");
    }
    for product in &page.content {
        let _ = writeln!(out, "{}", product_line(product));
    }
    out.push_str(&page_footer(page));
    out
}

pub fn cart(cart: &Cart) -> String {
    let mut out = String::from("Cart\n");
    for line in cart.lines() {
        let _ = writeln!(
            out,
            "  {} x{}  {}",
            line.name(),
            line.quantity,
            format_euro(line.line_total())
        );
    }
    if !cart.note().is_empty() {
        let _ = writeln!(out, "  note: {}", cart.note());
    }
    let _ = write!(
        out,
        "  {} items, total {}",
        cart.unit_count(),
        format_euro(cart.total())
    );
    out
}

pub fn order(order: &Order) -> String {
    let mut out = format!(
        "Order #{}  {}  {}\n",
        order.id_order,
        local_time::format(&order.date_time),
        order.customer_name()
    );
    for item in &order.products {
        let _ = writeln!(
            out,
            "  #{} {} x{}  {}",
            item.product_id,
            item.name.as_deref().unwrap_or("-"),
            item.ordered_quantity,
            format_euro(item.line_total())
        );
    }
    if let Some(note) = order.description.as_deref().filter(|d| !d.trim().is_empty()) {
        let _ = writeln!(out, "  note: {note}");
    }
    let _ = write!(out, "  total {}", format_euro(order.total()));
    out
}

pub fn orders(page: &Page<Order>) -> String {
    let mut out = String::new();
    if page.content.is_empty() {
        out.push_str("(no orders)\n");
    }
    for o in &page.content {
        let _ = writeln!(
            out,
            "#{:<6} {}  {:<24} {:>3} units  {}",
            o.id_order,
            local_time::format(&o.date_time),
            o.customer_name(),
            o.unit_count(),
            format_euro(o.total())
        );
    }
    out.push_str(&page_footer(page));
    out
}

pub fn profile(profile: &Profile) -> String {
    format!(
        "{} ({})\n  {} {}\n  email   {}\n  phone   {}\n  address {}, {}",
        profile.username,
        profile.role,
        profile.first_name,
        profile.last_name,
        profile.email,
        profile.phone,
        profile.address,
        profile.city
    )
}

pub fn alerts(alerts: &[StockAlert]) -> String {
    if alerts.is_empty() {
        return "No open alerts".to_string();
    }
    let mut out = String::new();
    for alert in alerts {
        let _ = writeln!(
            out,
            "#{:<5} {:<32} qty {:>3} / threshold {:>3}  {}  {}",
            alert.id,
            alert.product_name,
            alert.current_quantity,
            alert.threshold,
            alert.status,
            alert.created_at
        );
    }
    out
}

pub fn stats(stats: &SalesStats) -> String {
    let mut out = String::new();
    if let Some(notice) = &stats.notice {
        let _ = writeln!(out, "! {notice}");
    }
    let _ = writeln!(out, "Top selling ({})", stats.period.label());
    for row in &stats.top {
        let _ = writeln!(out, "  #{:<5} {:<32} {:>6}", row.product_id, row.name, row.total_sold);
    }
    let _ = writeln!(out, "Least selling ({})", stats.period.label());
    for row in &stats.least {
        let _ = writeln!(out, "  #{:<5} {:<32} {:>6}", row.product_id, row.name, row.total_sold);
    }
    out
}

pub fn promotion(promotion: &Promotion, now: chrono::NaiveDateTime) -> String {
    let window = |at: Option<&chrono::NaiveDateTime>| at.map_or_else(|| "-".to_string(), local_time::format);
    let mut out = format!(
        "#{:<4} {:<24} {} -> {}  [{}]",
        promotion.id,
        promotion.name,
        window(promotion.starts_at.as_ref()),
        window(promotion.ends_at.as_ref()),
        promotion.phase_at(now).label()
    );
    for item in &promotion.items {
        let _ = write!(
            out,
            "\n      #{} {} -{}%",
            item.product_id, item.product_name, item.discount_percent
        );
    }
    out
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = products("Products", &dashboard.products);
    let _ = write!(out, "\nOpen alerts: {}", dashboard.open_alerts);
    if let Some(s) = &dashboard.stats {
        let _ = write!(out, "\n{}", stats(s));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(json: &str) -> Product {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_product_line_shows_promo() {
        let line = product_line(&product(
            r#"{"productId":3,"name":"Phone X","price":500,"quantity":-1,
                "category":"SMARTPHONES","promoActive":true,"promoName":"Spring",
                "oldPrice":500,"discountedPrice":450}"#,
        ));
        assert!(line.contains("€ 450,00 (was € 500,00, Spring)"));
        assert!(line.contains("stock    0"));
    }

    #[test]
    fn test_empty_alerts() {
        assert_eq!(alerts(&[]), "No open alerts");
    }
}
