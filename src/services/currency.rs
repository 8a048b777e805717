use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::Signed;

use crate::{
    error::Result,
    models::NumericBase,
    services::conversion::{parse_numeric, round_decimals},
};

const FIAT_DECIMALS: u32 = 2;

const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("CNY", "¥"),
    ("INR", "₹"),
    ("KRW", "₩"),
    ("RUB", "₽"),
    ("AUD", "A$"),
    ("CAD", "CA$"),
];

fn currency_symbol(code: &str) -> Option<&'static str> {
    CURRENCY_SYMBOLS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code))
        .map(|(_, symbol)| *symbol)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats a fiat amount with exactly two decimals and thousands
/// separators. Known codes get their symbol as a prefix; any other code is
/// appended upper-cased.
pub fn format_currency_amount(amount: &BigDecimal, currency_code: &str) -> String {
    let rounded = round_decimals(amount, FIAT_DECIMALS);
    let (digits, scale) = rounded.as_bigint_and_exponent();
    let cents = digits * num_traits::pow(BigInt::from(10u32), (FIAT_DECIMALS as i64 - scale) as usize);

    let sign = if cents.sign() == Sign::Minus { "-" } else { "" };
    let cents = cents.abs();
    let hundred = BigInt::from(100u32);
    let whole = &cents / &hundred;
    let fraction = &cents % &hundred;

    let amount_text = format!(
        "{}.{:0>2}",
        group_thousands(&whole.to_string()),
        fraction.to_string()
    );

    match currency_symbol(currency_code) {
        Some(symbol) => format!("{sign}{symbol}{amount_text}"),
        None => format!("{sign}{amount_text} {}", currency_code.to_uppercase()),
    }
}

pub fn format_currency(value: &str, currency_code: &str) -> Result<String> {
    let amount = parse_numeric(value, NumericBase::Dec)?;
    Ok(format_currency_amount(&amount, currency_code))
}

pub fn format_eth_fee(eth_fee: &str) -> String {
    format!("{} ETH", eth_fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GasRendererError;

    #[test]
    fn test_always_two_decimals() {
        assert_eq!(format_currency("12.3", "usd").unwrap(), "$12.30");
        assert_eq!(format_currency("12", "usd").unwrap(), "$12.00");
        assert_eq!(format_currency("0.1", "usd").unwrap(), "$0.10");
        assert_eq!(format_currency("0.004", "usd").unwrap(), "$0.00");
        assert_eq!(format_currency("12.345678", "usd").unwrap(), "$12.35");
    }

    #[test]
    fn test_groups_thousands() {
        assert_eq!(format_currency("4200000", "usd").unwrap(), "$4,200,000.00");
        assert_eq!(format_currency("2000.084", "usd").unwrap(), "$2,000.08");
        assert_eq!(format_currency("999.99", "usd").unwrap(), "$999.99");
    }

    #[test]
    fn test_symbols_and_unknown_codes() {
        assert_eq!(format_currency("1.5", "EUR").unwrap(), "€1.50");
        assert_eq!(format_currency("1.5", "gbp").unwrap(), "£1.50");
        assert_eq!(format_currency("1.5", "xyz").unwrap(), "1.50 XYZ");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_currency("-1", "usd").unwrap(), "-$1.00");
    }

    #[test]
    fn test_amount_with_negative_scale() {
        let amount = BigDecimal::new(BigInt::from(12), -3);
        assert_eq!(format_currency_amount(&amount, "usd"), "$12,000.00");
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(matches!(
            format_currency("twelve", "usd"),
            Err(GasRendererError::InvalidNumericFormat { .. })
        ));
    }

    #[test]
    fn test_eth_fee() {
        assert_eq!(format_eth_fee("0.0000525"), "0.0000525 ETH");
    }
}
