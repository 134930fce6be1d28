//! Money formatting.
//!
//! Amounts are `Decimal` in euros. Display follows the Italian convention:
//! `.` groups thousands (always, even for four-digit amounts), `,` separates
//! the two decimals, and halves round away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as `1.234,56`.
#[must_use]
pub fn format_money(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}

/// Format an amount with the euro sign in front: `€ 1.234,56`.
#[must_use]
pub fn format_euro(value: Decimal) -> String {
    format!("€ {}", format_money(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal")
    }

    #[test]
    fn test_format_small_amounts() {
        assert_eq!(format_money(Decimal::ZERO), "0,00");
        assert_eq!(format_money(dec("9.5")), "9,50");
        assert_eq!(format_money(dec("999.99")), "999,99");
    }

    #[test]
    fn test_format_always_groups_thousands() {
        assert_eq!(format_money(dec("1234.5")), "1.234,50");
        assert_eq!(format_money(dec("1234567.891")), "1.234.567,89");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        assert_eq!(format_money(dec("0.005")), "0,01");
        assert_eq!(format_money(dec("-0.005")), "-0,01");
        assert_eq!(format_money(dec("2.344")), "2,34");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_money(dec("-1500")), "-1.500,00");
    }

    #[test]
    fn test_format_euro() {
        assert_eq!(format_euro(dec("19.9")), "€ 19,90");
    }
}
