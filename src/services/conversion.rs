use bigdecimal::BigDecimal;
use ethers::types::U256;
use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;

use crate::{
    error::{GasRendererError, Result},
    models::{Denomination, MonetaryValue, NumericBase, ETH_CURRENCY},
};

// Decimal fractions rarely terminate in hex; cut them off here.
const MAX_HEX_FRACTION_DIGITS: usize = 20;
// Keeps "1e999999999" from allocating a billion digits.
const MAX_DECIMAL_EXPONENT: i64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rounding {
    HalfUp,
    HalfDown,
}

#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    pub from_numeric_base: NumericBase,
    pub to_numeric_base: NumericBase,
    pub from_denomination: Option<Denomination>,
    pub to_denomination: Option<Denomination>,
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
    pub conversion_rate: Option<BigDecimal>,
    pub invert_conversion_rate: bool,
    pub number_of_decimals: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct MultiplyOptions {
    pub multiplicand_base: NumericBase,
    pub multiplier_base: NumericBase,
    pub to_numeric_base: NumericBase,
    pub from_denomination: Option<Denomination>,
    pub to_denomination: Option<Denomination>,
    pub number_of_decimals: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub a_base: NumericBase,
    pub b_base: NumericBase,
    pub to_numeric_base: NumericBase,
    pub from_denomination: Option<Denomination>,
    pub to_denomination: Option<Denomination>,
    pub number_of_decimals: Option<u32>,
}

fn pow10(exponent: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u32), exponent as usize)
}

/// Multiplies by `10^places` without touching the digits.
fn shift(amount: &BigDecimal, places: i64) -> BigDecimal {
    let (digits, scale) = amount.as_bigint_and_exponent();
    BigDecimal::new(digits, scale - places)
}

fn round_to(amount: &BigDecimal, places: i64, mode: Rounding) -> BigDecimal {
    let (digits, scale) = amount.as_bigint_and_exponent();
    if scale <= places {
        return amount.clone();
    }

    let divisor = pow10((scale - places) as u32);
    let quotient = &digits / &divisor;
    let remainder = &digits - &quotient * &divisor;
    let twice = remainder.abs() * BigInt::from(2u32);

    let away_from_zero = match twice.cmp(&divisor) {
        Ordering::Greater => true,
        Ordering::Equal => mode == Rounding::HalfUp,
        Ordering::Less => false,
    };

    let quotient = match (away_from_zero, digits.sign()) {
        (true, Sign::Minus) => quotient - BigInt::one(),
        (true, _) => quotient + BigInt::one(),
        (false, _) => quotient,
    };

    BigDecimal::new(quotient, places)
}

/// Rounds to `places` fraction digits, ties toward zero.
pub fn round_decimals(amount: &BigDecimal, places: u32) -> BigDecimal {
    round_to(amount, places as i64, Rounding::HalfDown)
}

/// Integer part, truncated toward zero.
pub fn whole_part(amount: &BigDecimal) -> BigInt {
    let (digits, scale) = amount.as_bigint_and_exponent();
    if scale <= 0 {
        digits * pow10((-scale) as u32)
    } else {
        digits / pow10(scale as u32)
    }
}

pub fn u256_to_decimal(value: U256) -> BigDecimal {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    BigDecimal::new(BigInt::from_bytes_be(Sign::Plus, &bytes), 0)
}

pub fn u256_to_hex(value: U256) -> String {
    format!("{:#x}", value)
}

fn parse_hex(text: &str) -> Option<BigDecimal> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part
        .chars()
        .chain(frac_part.chars())
        .all(|c| c.is_ascii_hexdigit())
    {
        return None;
    }

    let integer = if int_part.is_empty() {
        BigInt::zero()
    } else {
        BigInt::parse_bytes(int_part.as_bytes(), NumericBase::Hex.radix())?
    };
    let mut value = BigDecimal::new(integer, 0);

    if !frac_part.is_empty() {
        // f / 16^k == f * 5^(4k) / 10^(4k)
        let places = 4 * frac_part.len();
        let fraction = BigInt::parse_bytes(frac_part.as_bytes(), NumericBase::Hex.radix())?;
        let scaled = fraction * num_traits::pow(BigInt::from(5u32), places);
        value = value + BigDecimal::new(scaled, places as i64);
    }

    Some(value)
}

fn parse_dec(text: &str) -> Option<BigDecimal> {
    let (mantissa, exponent) = match text.find(|c: char| c == 'e' || c == 'E') {
        Some(idx) => (&text[..idx], text[idx + 1..].parse::<i64>().ok()?),
        None => (text, 0),
    };
    if exponent.abs() > MAX_DECIMAL_EXPONENT {
        return None;
    }

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part
        .chars()
        .chain(frac_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let digits = BigInt::parse_bytes(
        format!("{int_part}{frac_part}").as_bytes(),
        NumericBase::Dec.radix(),
    )?;
    Some(BigDecimal::new(digits, frac_part.len() as i64 - exponent))
}

/// Parses `raw` as a number written in `base`. Hex input may carry a `0x`
/// prefix; decimal input may carry a fraction and an exponent.
pub fn parse_numeric(raw: &str, base: NumericBase) -> Result<BigDecimal> {
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let amount = match base {
        NumericBase::Hex => parse_hex(unsigned),
        NumericBase::Dec => parse_dec(unsigned),
    }
    .ok_or_else(|| GasRendererError::invalid_numeric(raw, base))?;

    Ok(if negative { -amount } else { amount })
}

fn render_dec(magnitude: &BigInt, scale: i64) -> String {
    if scale <= 0 {
        return (magnitude * pow10((-scale) as u32)).to_string();
    }

    let scale = scale as usize;
    let mut text = magnitude.to_string();
    if text.len() <= scale {
        text = format!("{}{}", "0".repeat(scale + 1 - text.len()), text);
    }

    let (int_part, frac_part) = text.split_at(text.len() - scale);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{frac_part}")
    }
}

fn render_hex(magnitude: &BigInt, scale: i64) -> String {
    let radix = NumericBase::Hex.radix();
    if scale <= 0 {
        return (magnitude * pow10((-scale) as u32)).to_str_radix(radix);
    }

    let unit = pow10(scale as u32);
    let integer = magnitude / &unit;
    let mut fraction = magnitude % &unit;
    let mut text = integer.to_str_radix(radix);

    if !fraction.is_zero() {
        let mut digits = String::new();
        for _ in 0..MAX_HEX_FRACTION_DIGITS {
            if fraction.is_zero() {
                break;
            }
            fraction = fraction * BigInt::from(radix);
            digits.push_str(&(&fraction / &unit).to_str_radix(radix));
            fraction = &fraction % &unit;
        }
        let digits = digits.trim_end_matches('0');
        if !digits.is_empty() {
            text.push('.');
            text.push_str(digits);
        }
    }

    text
}

/// Renders an amount in `base`. Hex output always carries the `0x` prefix.
pub fn render_numeric(amount: &BigDecimal, base: NumericBase) -> String {
    let (digits, scale) = amount.as_bigint_and_exponent();
    let magnitude = digits.abs();

    let body = match base {
        NumericBase::Dec => render_dec(&magnitude, scale),
        NumericBase::Hex => format!("0x{}", render_hex(&magnitude, scale)),
    };

    if digits.sign() == Sign::Minus && body != "0" && body != "0x0" {
        format!("-{body}")
    } else {
        body
    }
}

fn same_currency(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

impl MonetaryValue {
    pub fn parse(raw: &str, base: NumericBase, denomination: Denomination) -> Result<Self> {
        Ok(Self::new(parse_numeric(raw, base)?, base, denomination))
    }

    /// Exact rescale into whole ETH.
    pub fn to_eth(&self) -> MonetaryValue {
        MonetaryValue {
            amount: shift(&self.amount, -self.denomination.decimals()),
            base: self.base,
            denomination: Denomination::Eth,
            currency: self.currency.clone(),
        }
    }

    /// Rescales into `target`. WEI amounts are quantized to whole wei and
    /// GWEI amounts to nine decimals, the finest a wei-denominated value holds.
    pub fn to_denomination(&self, target: Denomination) -> MonetaryValue {
        let eth = shift(&self.amount, -self.denomination.decimals());
        let scaled = shift(&eth, target.decimals());
        let amount = match target {
            Denomination::Wei => round_to(&scaled, 0, Rounding::HalfUp),
            Denomination::Gwei => round_to(&scaled, 9, Rounding::HalfUp),
            Denomination::Eth => scaled,
        };

        MonetaryValue {
            amount,
            base: self.base,
            denomination: target,
            currency: self.currency.clone(),
        }
    }

    /// Converts into `target` currency using a rate quoted per whole unit of
    /// the source currency. Conversions between equal codes need no rate.
    pub fn to_currency(
        &self,
        target: &str,
        conversion_rate: Option<&BigDecimal>,
        invert: bool,
    ) -> Result<MonetaryValue> {
        if same_currency(&self.currency, target) {
            return Ok(self.clone());
        }

        let missing_rate = || GasRendererError::MissingConversionRate {
            from: self.currency.clone(),
            to: target.to_string(),
        };
        let rate = conversion_rate.ok_or_else(missing_rate)?;

        let whole = self.to_eth();
        let amount = if invert {
            if rate.is_zero() {
                return Err(missing_rate());
            }
            &whole.amount / rate
        } else {
            &whole.amount * rate
        };

        Ok(MonetaryValue {
            amount,
            base: self.base,
            denomination: Denomination::Eth,
            currency: target.to_string(),
        })
    }

    pub fn rounded(&self, places: u32) -> MonetaryValue {
        MonetaryValue {
            amount: round_decimals(&self.amount, places),
            ..self.clone()
        }
    }
}

impl fmt::Display for MonetaryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render_numeric(&self.amount, self.base))
    }
}

/// Runs the conversion steps in order: source denomination, currency,
/// target denomination, rounding, target base.
pub fn convert_value(value: MonetaryValue, options: &ConversionOptions) -> Result<MonetaryValue> {
    let mut value = match options.from_denomination {
        Some(_) => value.to_eth(),
        None => value,
    };

    if let Some(to_currency) = &options.to_currency {
        value = value.to_currency(
            to_currency,
            options.conversion_rate.as_ref(),
            options.invert_conversion_rate,
        )?;
    }

    if let Some(denomination) = options.to_denomination {
        value = value.to_denomination(denomination);
    }

    if let Some(places) = options.number_of_decimals {
        value = value.rounded(places);
    }

    Ok(value.in_base(options.to_numeric_base))
}

fn convert_amount(amount: BigDecimal, options: &ConversionOptions) -> Result<String> {
    let source = MonetaryValue::new(
        amount,
        options.from_numeric_base,
        options.from_denomination.unwrap_or(Denomination::Eth),
    )
    .with_currency(options.from_currency.as_deref().unwrap_or(ETH_CURRENCY));

    Ok(convert_value(source, options)?.to_string())
}

pub fn convert(value: &str, options: &ConversionOptions) -> Result<String> {
    let amount = parse_numeric(value, options.from_numeric_base)?;
    convert_amount(amount, options)
}

pub fn multiply_currencies(a: &str, b: &str, options: &MultiplyOptions) -> Result<String> {
    let multiplicand = parse_numeric(a, options.multiplicand_base)?;
    let multiplier = parse_numeric(b, options.multiplier_base)?;

    convert_amount(
        &multiplicand * &multiplier,
        &ConversionOptions {
            to_numeric_base: options.to_numeric_base,
            from_denomination: options.from_denomination,
            to_denomination: options.to_denomination,
            number_of_decimals: options.number_of_decimals,
            ..Default::default()
        },
    )
}

pub fn add_currencies(a: &str, b: &str, options: &AddOptions) -> Result<String> {
    let augend = parse_numeric(a, options.a_base)?;
    let addend = parse_numeric(b, options.b_base)?;

    convert_amount(
        &augend + &addend,
        &ConversionOptions {
            to_numeric_base: options.to_numeric_base,
            from_denomination: options.from_denomination,
            to_denomination: options.to_denomination,
            number_of_decimals: options.number_of_decimals,
            ..Default::default()
        },
    )
}

/// Gas limit times gas price, both hex, as a hex total.
pub fn calc_gas_total(gas_limit: &str, gas_price: &str) -> Result<String> {
    multiply_currencies(
        gas_limit,
        gas_price,
        &MultiplyOptions {
            multiplicand_base: NumericBase::Hex,
            multiplier_base: NumericBase::Hex,
            to_numeric_base: NumericBase::Hex,
            ..Default::default()
        },
    )
}

/// Sums two hex WEI amounts into a decimal ETH string with six decimals.
pub fn add_hex_weis_to_dec(a_hex_wei: &str, b_hex_wei: &str) -> Result<String> {
    add_currencies(
        a_hex_wei,
        b_hex_wei,
        &AddOptions {
            a_base: NumericBase::Hex,
            b_base: NumericBase::Hex,
            to_numeric_base: NumericBase::Dec,
            from_denomination: Some(Denomination::Wei),
            number_of_decimals: Some(6),
            ..Default::default()
        },
    )
}

pub fn dec_eth_to_converted_currency(
    eth_total: &str,
    converted_currency: &str,
    conversion_rate: Option<&BigDecimal>,
) -> Result<String> {
    convert(
        eth_total,
        &ConversionOptions {
            from_numeric_base: NumericBase::Dec,
            to_numeric_base: NumericBase::Dec,
            from_currency: Some(ETH_CURRENCY.to_string()),
            to_currency: Some(converted_currency.to_string()),
            conversion_rate: conversion_rate.cloned(),
            number_of_decimals: Some(2),
            ..Default::default()
        },
    )
}

pub fn dec_gwei_to_hex_wei(dec_gwei: &str) -> Result<String> {
    convert(
        dec_gwei,
        &ConversionOptions {
            from_numeric_base: NumericBase::Dec,
            to_numeric_base: NumericBase::Hex,
            from_denomination: Some(Denomination::Gwei),
            to_denomination: Some(Denomination::Wei),
            ..Default::default()
        },
    )
}

pub fn hex_wei_to_dec_gwei(hex_wei: &str) -> Result<String> {
    convert(
        hex_wei,
        &ConversionOptions {
            from_numeric_base: NumericBase::Hex,
            to_numeric_base: NumericBase::Dec,
            from_denomination: Some(Denomination::Wei),
            to_denomination: Some(Denomination::Gwei),
            ..Default::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(text: &str) -> BigDecimal {
        BigDecimal::from_str(text).unwrap()
    }

    #[test]
    fn test_parse_hex_with_and_without_prefix() {
        assert_eq!(parse_numeric("0x5208", NumericBase::Hex).unwrap(), dec("21000"));
        assert_eq!(parse_numeric("5208", NumericBase::Hex).unwrap(), dec("21000"));
        assert_eq!(parse_numeric("0X3B9ACA00", NumericBase::Hex).unwrap(), dec("1000000000"));
        assert_eq!(parse_numeric("0x2.8", NumericBase::Hex).unwrap(), dec("2.5"));
        assert_eq!(parse_numeric("-0x10", NumericBase::Hex).unwrap(), dec("-16"));
    }

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(parse_numeric("25", NumericBase::Dec).unwrap(), dec("25"));
        assert_eq!(parse_numeric("14.4", NumericBase::Dec).unwrap(), dec("14.4"));
        assert_eq!(parse_numeric(".5", NumericBase::Dec).unwrap(), dec("0.5"));
        assert_eq!(parse_numeric("1e-7", NumericBase::Dec).unwrap(), dec("0.0000001"));
        assert_eq!(parse_numeric("2.5E3", NumericBase::Dec).unwrap(), dec("2500"));
    }

    #[test]
    fn test_rejects_malformed_input() {
        let cases = [
            ("0xzz", NumericBase::Hex),
            ("0x", NumericBase::Hex),
            ("", NumericBase::Hex),
            ("0x1.2.3", NumericBase::Hex),
            ("abc", NumericBase::Dec),
            ("0x10", NumericBase::Dec),
            ("1.2.3", NumericBase::Dec),
            ("12e", NumericBase::Dec),
            ("--5", NumericBase::Dec),
            ("1e99999", NumericBase::Dec),
        ];

        for (raw, base) in cases {
            match parse_numeric(raw, base) {
                Err(GasRendererError::InvalidNumericFormat { value, base: got }) => {
                    assert_eq!(value, raw);
                    assert_eq!(got, base);
                }
                other => panic!("expected InvalidNumericFormat for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_render_strips_trailing_zeros_and_prefixes_hex() {
        assert_eq!(render_numeric(&dec("0.10"), NumericBase::Dec), "0.1");
        assert_eq!(
            render_numeric(&BigDecimal::new(BigInt::from(1), -3), NumericBase::Dec),
            "1000"
        );
        assert_eq!(render_numeric(&dec("0.0000525"), NumericBase::Dec), "0.0000525");
        assert_eq!(render_numeric(&dec("21000"), NumericBase::Hex), "0x5208");
        assert_eq!(render_numeric(&dec("2.5"), NumericBase::Hex), "0x2.8");
        assert_eq!(render_numeric(&dec("0"), NumericBase::Hex), "0x0");
        assert_eq!(render_numeric(&dec("-16"), NumericBase::Hex), "-0x10");
    }

    #[test]
    fn test_non_terminating_hex_fraction_is_truncated() {
        let rendered = render_numeric(&dec("0.1"), NumericBase::Hex);
        assert_eq!(rendered, "0x0.19999999999999999999");
    }

    #[test]
    fn test_rounding_ties_toward_zero() {
        assert_eq!(round_decimals(&dec("0.105"), 2), dec("0.10"));
        assert_eq!(round_decimals(&dec("0.1051"), 2), dec("0.11"));
        assert_eq!(round_decimals(&dec("-0.105"), 2), dec("-0.10"));
        assert_eq!(round_decimals(&dec("0.084"), 2), dec("0.08"));
        assert_eq!(round_decimals(&dec("3"), 2), dec("3"));
    }

    #[test]
    fn test_wei_eth_round_trip_is_lossless() {
        for wei in ["0x0", "0x1", "0x5208", "0xde0b6b3a7640000", "0xffffffffffffffffffffffffffff"] {
            let eth = convert(
                wei,
                &ConversionOptions {
                    from_numeric_base: NumericBase::Hex,
                    to_numeric_base: NumericBase::Dec,
                    from_denomination: Some(Denomination::Wei),
                    ..Default::default()
                },
            )
            .unwrap();

            let back = convert(
                &eth,
                &ConversionOptions {
                    from_numeric_base: NumericBase::Dec,
                    to_numeric_base: NumericBase::Hex,
                    from_denomination: Some(Denomination::Eth),
                    to_denomination: Some(Denomination::Wei),
                    ..Default::default()
                },
            )
            .unwrap();

            assert_eq!(back, wei);
        }
    }

    #[test]
    fn test_one_ether_in_each_denomination() {
        let one_eth = "0xde0b6b3a7640000";
        let as_eth = convert(
            one_eth,
            &ConversionOptions {
                from_numeric_base: NumericBase::Hex,
                from_denomination: Some(Denomination::Wei),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(as_eth, "1");

        assert_eq!(hex_wei_to_dec_gwei(one_eth).unwrap(), "1000000000");
        assert_eq!(dec_gwei_to_hex_wei("1").unwrap(), "0x3b9aca00");
        assert_eq!(dec_gwei_to_hex_wei("2.5").unwrap(), "0x9502f900");
    }

    #[test]
    fn test_gas_total_is_exact_product() {
        assert_eq!(calc_gas_total("0x5208", "0x3b9aca00").unwrap(), "0x1319718a5000");

        let limit = "0xffffffffffff";
        let price = "0x174876e800ffffffff";
        let expected = BigInt::parse_bytes(b"ffffffffffff", 16).unwrap()
            * BigInt::parse_bytes(b"174876e800ffffffff", 16).unwrap();
        assert_eq!(
            calc_gas_total(limit, price).unwrap(),
            format!("0x{}", expected.to_str_radix(16))
        );
    }

    #[test]
    fn test_multiply_currencies_to_hex_keeps_fraction() {
        let corrected = multiply_currencies(
            "25",
            "0.1",
            &MultiplyOptions {
                multiplicand_base: NumericBase::Dec,
                multiplier_base: NumericBase::Dec,
                to_numeric_base: NumericBase::Hex,
                number_of_decimals: Some(9),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(corrected, "0x2.8");
    }

    #[test]
    fn test_multiply_currencies_rejects_bad_operand() {
        let err = multiply_currencies("0xgg", "2", &MultiplyOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            GasRendererError::InvalidNumericFormat { base: NumericBase::Dec, .. }
        ));
    }

    #[test]
    fn test_currency_conversion_requires_rate() {
        let err = dec_eth_to_converted_currency("1", "usd", None).unwrap_err();
        assert!(matches!(err, GasRendererError::MissingConversionRate { .. }));

        let rate = dec("2000");
        assert_eq!(
            dec_eth_to_converted_currency("0.0000525", "usd", Some(&rate)).unwrap(),
            "0.1"
        );
    }

    #[test]
    fn test_same_currency_needs_no_rate() {
        assert_eq!(dec_eth_to_converted_currency("1.5", "eth", None).unwrap(), "1.5");
    }

    #[test]
    fn test_inverted_rate_divides() {
        let converted = convert(
            "4000",
            &ConversionOptions {
                from_currency: Some("usd".to_string()),
                to_currency: Some(ETH_CURRENCY.to_string()),
                conversion_rate: Some(dec("2000")),
                invert_conversion_rate: true,
                number_of_decimals: Some(4),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(converted, "2");
    }

    #[test]
    fn test_add_hex_weis_to_dec() {
        assert_eq!(
            add_hex_weis_to_dec("0xde0b6b3a7640000", "0x2632e314a000").unwrap(),
            "1.000042"
        );
        assert_eq!(add_hex_weis_to_dec("0x0", "0x0").unwrap(), "0");
    }

    #[test]
    fn test_u256_helpers() {
        let value = U256::from(21_000u64);
        assert_eq!(u256_to_decimal(value), dec("21000"));
        assert_eq!(u256_to_hex(value), "0x5208");
        assert_eq!(u256_to_hex(U256::zero()), "0x0");
    }

    #[test]
    fn test_whole_part_truncates() {
        assert_eq!(whole_part(&dec("144.9")), BigInt::from(144));
        assert_eq!(
            whole_part(&BigDecimal::new(BigInt::from(1), -2)),
            BigInt::from(100)
        );
    }
}
