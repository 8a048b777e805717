use bigdecimal::BigDecimal;
use ethers::types::U256;
use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use crate::{
    error::{GasRendererError, Result},
    models::{
        BasicEstimates, ConversionContext, Denomination, GasEstimateTier, MonetaryValue,
        NumericBase, NumericString, RenderableGasEstimate,
    },
    services::{
        conversion::{parse_numeric, round_decimals, u256_to_decimal, whole_part},
        currency::{format_currency_amount, format_eth_fee},
    },
};

const ETH_FEE_DECIMALS: u32 = 9;
const TIME_ESTIMATE_DECIMALS: u32 = 1;

// The gas station feed quotes prices in tenths of a GWEI.
fn estimate_correction() -> BigDecimal {
    BigDecimal::new(BigInt::from(1), 1)
}

fn parse_estimate(value: &NumericString) -> Result<BigDecimal> {
    parse_numeric(value.as_str(), value.base())
}

/// Uncorrected feed price in GWEI. `0x` values are wire-encoded WEI.
fn raw_gwei_price(estimate: &NumericString) -> Result<BigDecimal> {
    let raw = parse_estimate(estimate)?;
    Ok(match estimate.base() {
        NumericBase::Hex => {
            MonetaryValue::new(raw, NumericBase::Dec, Denomination::Wei)
                .to_denomination(Denomination::Gwei)
                .amount
        }
        NumericBase::Dec => raw,
    })
}

fn required<'a>(value: Option<&'a NumericString>, key: &'static str) -> Result<&'a NumericString> {
    value.ok_or(GasRendererError::MissingEstimate(key))
}

/// Raw feed estimate scaled into GWEI.
pub fn corrected_gwei_price(estimate: &NumericString) -> Result<MonetaryValue> {
    let raw = raw_gwei_price(estimate)?;
    Ok(MonetaryValue::new(
        &raw * &estimate_correction(),
        NumericBase::Dec,
        Denomination::Gwei,
    ))
}

pub fn eth_total(price: &MonetaryValue, gas_limit: U256) -> MonetaryValue {
    let total = MonetaryValue {
        amount: &price.amount * &u256_to_decimal(gas_limit),
        ..price.clone()
    };
    total.to_eth()
}

pub fn renderable_eth_fee(total: &MonetaryValue) -> String {
    format_eth_fee(&total.rounded(ETH_FEE_DECIMALS).in_base(NumericBase::Dec).to_string())
}

pub fn renderable_converted_currency_fee(
    total: &MonetaryValue,
    context: &ConversionContext,
) -> Result<String> {
    let converted = total.to_currency(
        &context.current_currency,
        context.conversion_rate.as_ref(),
        false,
    )?;
    Ok(format_currency_amount(&converted.amount, &context.current_currency))
}

pub fn time_estimate_in_seconds(
    block_wait: &NumericString,
    block_time: &NumericString,
) -> Result<BigDecimal> {
    let blocks = parse_estimate(block_wait)?;
    let seconds_per_block = parse_estimate(block_time)?;
    Ok(round_decimals(&(&blocks * &seconds_per_block), TIME_ESTIMATE_DECIMALS))
}

/// `~X min Y sec`, leaving out a zero component. Nothing left renders as
/// `~0 sec`; negative durations count as zero.
pub fn format_time_estimate(total_seconds: &BigDecimal) -> String {
    let mut whole_seconds = whole_part(total_seconds);
    if whole_seconds.sign() == Sign::Minus {
        whole_seconds = BigInt::zero();
    }

    let sixty = BigInt::from(60u32);
    let minutes = &whole_seconds / &sixty;
    let seconds = &whole_seconds % &sixty;

    let mut parts = Vec::with_capacity(2);
    if !minutes.is_zero() {
        parts.push(format!("{} min", minutes));
    }
    if !seconds.is_zero() {
        parts.push(format!("{} sec", seconds));
    }

    if parts.is_empty() {
        "~0 sec".to_string()
    } else {
        format!("~{}", parts.join(" "))
    }
}

pub fn renderable_time_estimate(
    block_wait: &NumericString,
    block_time: &NumericString,
) -> Result<String> {
    let total_seconds = time_estimate_in_seconds(block_wait, block_time)?;
    Ok(format_time_estimate(&total_seconds))
}

pub fn gas_price_in_hex_wei(estimate: &NumericString) -> Result<String> {
    let price = corrected_gwei_price(estimate)?;
    Ok(price
        .to_denomination(Denomination::Wei)
        .in_base(NumericBase::Hex)
        .to_string())
}

pub fn build_renderable_estimate(
    estimates: &BasicEstimates,
    tier: GasEstimateTier,
    context: &ConversionContext,
) -> Result<RenderableGasEstimate> {
    let estimate = required(estimates.price(tier), tier.price_key())?;
    let block_wait = required(estimates.wait(tier), tier.wait_key())?;
    let block_time = required(estimates.block_time.as_ref(), "blockTime")?;

    let price = corrected_gwei_price(estimate)?;
    let total = eth_total(&price, context.gas_limit);

    let renderable = RenderableGasEstimate {
        fee_in_primary_currency: renderable_converted_currency_fee(&total, context)?,
        fee_in_secondary_currency: renderable_eth_fee(&total),
        time_estimate: renderable_time_estimate(block_wait, block_time)?,
        price_in_hex_wei: gas_price_in_hex_wei(estimate)?,
    };

    tracing::debug!(
        tier = ?tier,
        fee = %renderable.fee_in_secondary_currency,
        price = %renderable.price_in_hex_wei,
        "Rendered gas estimate"
    );

    Ok(renderable)
}

/// One record per speed tier, fast first. Empty while the estimates are
/// still loading, which callers must read as "not yet available".
pub fn build_renderable_estimates(
    estimates: &BasicEstimates,
    loading: bool,
    context: &ConversionContext,
) -> Result<Vec<RenderableGasEstimate>> {
    if loading {
        tracing::debug!("Basic gas estimates still loading");
        return Ok(Vec::new());
    }

    GasEstimateTier::ALL
        .iter()
        .map(|tier| build_renderable_estimate(estimates, *tier, context))
        .collect()
}

pub fn average_price_estimate_in_hex_wei(estimates: &BasicEstimates) -> Result<String> {
    let average = required(
        estimates.price(GasEstimateTier::Average),
        GasEstimateTier::Average.price_key(),
    )?;
    gas_price_in_hex_wei(average)
}

/// Index of the tier whose price equals `custom_price_in_hex`, if any.
pub fn default_active_button_index(
    gas_button_info: &[RenderableGasEstimate],
    custom_price_in_hex: &str,
) -> Option<usize> {
    let custom = parse_numeric(custom_price_in_hex, NumericBase::Hex).ok()?;
    gas_button_info.iter().position(|info| {
        parse_numeric(&info.price_in_hex_wei, NumericBase::Hex)
            .map(|price| price == custom)
            .unwrap_or(false)
    })
}
