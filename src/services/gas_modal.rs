use ethers::types::U256;

use crate::{
    error::{GasRendererError, Result},
    models::{
        AppSnapshot, ButtonGroupProps, ConversionContext, GasModalView, InfoRowProps,
        RenderableGasEstimate,
    },
    services::{
        conversion::{
            add_hex_weis_to_dec, calc_gas_total, dec_eth_to_converted_currency,
            hex_wei_to_dec_gwei, u256_to_hex,
        },
        currency::{format_currency, format_eth_fee},
        estimates::default_active_button_index,
        selectors::{
            get_average_price_estimate_in_hex_wei, get_basic_gas_estimate_loading_status,
            get_custom_gas_limit, get_custom_gas_price,
        },
    },
};

const ZERO_HEX: &str = "0x0";

/// Gas fields of the transaction being edited. The price is `0x` hex since
/// it may come straight from an estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionGas {
    pub gas_limit: U256,
    pub gas_price: String,
    pub value: U256,
}

/// The confirmed transaction's parameters, or the send form's with the
/// average estimate standing in for a missing gas price.
pub fn transaction_gas(snapshot: &AppSnapshot) -> Result<TransactionGas> {
    if let Some(tx) = &snapshot.tx_params {
        return Ok(TransactionGas {
            gas_limit: tx.gas,
            gas_price: u256_to_hex(tx.gas_price),
            value: tx.value,
        });
    }

    let gas_price = match snapshot.send.gas_price {
        Some(price) => u256_to_hex(price),
        None if get_basic_gas_estimate_loading_status(snapshot) => {
            return Err(GasRendererError::MissingGasPrice)
        }
        None => get_average_price_estimate_in_hex_wei(snapshot)?,
    };

    Ok(TransactionGas {
        gas_limit: snapshot.send.gas_limit,
        gas_price,
        value: snapshot.send.amount,
    })
}

pub fn add_hex_weis_to_renderable_eth(a_hex_wei: &str, b_hex_wei: &str) -> Result<String> {
    let eth_total = add_hex_weis_to_dec(a_hex_wei, b_hex_wei)?;
    Ok(format_eth_fee(&eth_total))
}

pub fn add_hex_weis_to_renderable_fiat(
    a_hex_wei: &str,
    b_hex_wei: &str,
    context: &ConversionContext,
) -> Result<String> {
    let eth_total = add_hex_weis_to_dec(a_hex_wei, b_hex_wei)?;
    let converted = dec_eth_to_converted_currency(
        &eth_total,
        &context.current_currency,
        context.conversion_rate.as_ref(),
    )?;
    format_currency(&converted, &context.current_currency)
}

fn limit_as_u64(limit: U256) -> Result<u64> {
    if limit > U256::from(u64::MAX) {
        return Err(GasRendererError::GasLimitOverflow(u256_to_hex(limit)));
    }
    Ok(limit.as_u64())
}

pub fn build_gas_modal_view(
    snapshot: &AppSnapshot,
    context: &ConversionContext,
    gas_button_info: &[RenderableGasEstimate],
) -> Result<GasModalView> {
    let tx = transaction_gas(snapshot)?;
    let value = u256_to_hex(tx.value);
    let gas_total = calc_gas_total(&u256_to_hex(tx.gas_limit), &tx.gas_price)?;

    let custom_price_in_hex = get_custom_gas_price(snapshot)
        .map(u256_to_hex)
        .unwrap_or_else(|| tx.gas_price.clone());
    let custom_limit = get_custom_gas_limit(snapshot).unwrap_or(tx.gas_limit);
    let custom_limit_in_hex = u256_to_hex(custom_limit);
    let custom_gas_total = calc_gas_total(&custom_limit_in_hex, &custom_price_in_hex)?;

    let new_total_fiat = add_hex_weis_to_renderable_fiat(&value, &custom_gas_total, context)?;

    let info_row_props = InfoRowProps {
        original_total_fiat: add_hex_weis_to_renderable_fiat(&value, &gas_total, context)?,
        original_total_eth: add_hex_weis_to_renderable_eth(&value, &gas_total)?,
        new_total_fiat: new_total_fiat.clone(),
        new_total_eth: add_hex_weis_to_renderable_eth(&value, &custom_gas_total)?,
        transaction_fee: add_hex_weis_to_renderable_eth(ZERO_HEX, &custom_gas_total)?,
        send_amount: add_hex_weis_to_renderable_eth(&value, ZERO_HEX)?,
    };

    let gas_price_button_group_props = ButtonGroupProps {
        button_data_loading: get_basic_gas_estimate_loading_status(snapshot),
        default_active_button_index: default_active_button_index(
            gas_button_info,
            &custom_price_in_hex,
        ),
        gas_button_info: gas_button_info.to_vec(),
    };

    tracing::debug!(
        custom_price = %custom_price_in_hex,
        custom_limit = %custom_limit_in_hex,
        new_total = %info_row_props.new_total_eth,
        "Built gas modal view"
    );

    Ok(GasModalView {
        hide_basic: snapshot.hide_basic,
        custom_gas_price: hex_wei_to_dec_gwei(&custom_price_in_hex)?,
        custom_gas_limit: limit_as_u64(custom_limit)?,
        custom_modal_gas_price_in_hex: custom_price_in_hex,
        custom_modal_gas_limit_in_hex: custom_limit_in_hex,
        new_total_fiat,
        gas_price_button_group_props,
        info_row_props,
    })
}
