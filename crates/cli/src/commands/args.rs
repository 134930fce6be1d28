//! Value parsers for clap arguments.

use chrono::NaiveDate;
use vetrina_core::ProductCategory;

/// `PRODUCT_ID=QUANTITY`, both positive.
pub fn parse_order_line(raw: &str) -> Result<(i64, u32), String> {
    let (id, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PRODUCT_ID=QUANTITY, got '{raw}'"))?;
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid product id '{id}'"))?;
    let quantity: u32 = quantity
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity '{quantity}'"))?;
    if id <= 0 || quantity == 0 {
        return Err(format!("product id and quantity must be positive in '{raw}'"));
    }
    Ok((id, quantity))
}

/// `PRODUCT_ID=PERCENT` for promotion items. The percentage is checked
/// later, together with the rest of the draft.
pub fn parse_promotion_item(raw: &str) -> Result<(i64, String), String> {
    let (id, discount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PRODUCT_ID=PERCENT, got '{raw}'"))?;
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid product id '{id}'"))?;
    Ok((id, discount.trim().to_string()))
}

/// Category code, case-insensitive.
pub fn parse_category(raw: &str) -> Result<ProductCategory, String> {
    let code = raw.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err("category must not be empty".to_string());
    }
    Ok(ProductCategory::from(code))
}

/// `YYYY-MM-DD` or `dd/mm/yyyy`.
pub fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .map_err(|_| format!("invalid date '{raw}' (expected YYYY-MM-DD or dd/mm/yyyy)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_line() {
        assert_eq!(parse_order_line("7=2"), Ok((7, 2)));
        assert_eq!(parse_order_line(" 7 = 2 "), Ok((7, 2)));
        assert!(parse_order_line("7").is_err());
        assert!(parse_order_line("7=0").is_err());
        assert!(parse_order_line("x=1").is_err());
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("monitor"), Ok(ProductCategory::Monitor));
        assert!(parse_category(" ").is_err());
    }

    #[test]
    fn test_parse_day() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 5);
        assert_eq!(parse_day("2025-03-05").ok(), expected);
        assert_eq!(parse_day("05/03/2025").ok(), expected);
        assert!(parse_day("March 5").is_err());
    }
}
