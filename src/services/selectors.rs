use bigdecimal::BigDecimal;
use ethers::types::U256;

use crate::{
    error::Result,
    models::{AppSnapshot, ConversionContext, GasErrors, RenderableGasEstimate},
    services::{
        conversion::parse_numeric,
        estimates::{average_price_estimate_in_hex_wei, build_renderable_estimates},
    },
};

pub fn get_custom_gas_errors(snapshot: &AppSnapshot) -> &GasErrors {
    &snapshot.gas.errors
}

pub fn get_custom_gas_limit(snapshot: &AppSnapshot) -> Option<U256> {
    snapshot.gas.custom_data.limit
}

pub fn get_custom_gas_price(snapshot: &AppSnapshot) -> Option<U256> {
    snapshot.gas.custom_data.price
}

pub fn get_custom_gas_total(snapshot: &AppSnapshot) -> Option<U256> {
    snapshot.gas.custom_data.total
}

pub fn get_basic_gas_estimate_loading_status(snapshot: &AppSnapshot) -> bool {
    snapshot.gas.basic_estimate_is_loading
}

/// Gas limit the fee estimates are priced with: the pending transaction's
/// when there is one, otherwise the send form's.
pub fn get_gas_limit(snapshot: &AppSnapshot) -> U256 {
    snapshot
        .tx_params
        .as_ref()
        .map(|tx| tx.gas)
        .unwrap_or(snapshot.send.gas_limit)
}

pub fn get_conversion_rate(snapshot: &AppSnapshot) -> Result<Option<BigDecimal>> {
    snapshot
        .conversion_rate
        .as_ref()
        .map(|rate| parse_numeric(rate.as_str(), rate.base()))
        .transpose()
}

pub fn get_current_currency(snapshot: &AppSnapshot, default_currency: &str) -> String {
    snapshot
        .current_currency
        .clone()
        .unwrap_or_else(|| default_currency.to_string())
}

pub fn conversion_context(
    snapshot: &AppSnapshot,
    default_currency: &str,
) -> Result<ConversionContext> {
    Ok(ConversionContext {
        conversion_rate: get_conversion_rate(snapshot)?,
        current_currency: get_current_currency(snapshot, default_currency),
        gas_limit: get_gas_limit(snapshot),
    })
}

pub fn get_renderable_basic_estimate_data(
    snapshot: &AppSnapshot,
    context: &ConversionContext,
) -> Result<Vec<RenderableGasEstimate>> {
    build_renderable_estimates(
        &snapshot.gas.basic_estimates,
        get_basic_gas_estimate_loading_status(snapshot),
        context,
    )
}

pub fn get_average_price_estimate_in_hex_wei(snapshot: &AppSnapshot) -> Result<String> {
    average_price_estimate_in_hex_wei(&snapshot.gas.basic_estimates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GasRendererError;
    use std::str::FromStr;

    fn snapshot(json: serde_json::Value) -> AppSnapshot {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_read_through_custom_data() {
        let state = snapshot(serde_json::json!({
            "gas": {
                "customData": { "limit": "0x5208", "price": "0x77359400", "total": null },
                "errors": { "gasPrice": "Gas price too low" },
                "basicEstimateIsLoading": true
            }
        }));

        assert_eq!(get_custom_gas_limit(&state), Some(U256::from(21_000u64)));
        assert_eq!(get_custom_gas_price(&state), Some(U256::from(2_000_000_000u64)));
        assert_eq!(get_custom_gas_total(&state), None);
        assert!(get_basic_gas_estimate_loading_status(&state));
        assert_eq!(
            get_custom_gas_errors(&state).gas_price.as_deref(),
            Some("Gas price too low")
        );
        assert_eq!(get_custom_gas_errors(&state).gas_limit, None);
    }

    #[test]
    fn test_context_prefers_transaction_gas() {
        let state = snapshot(serde_json::json!({
            "send": { "gasLimit": "0x5208", "amount": "0x0" },
            "txParams": { "gas": "0x7530", "gasPrice": "0x3b9aca00", "value": "0x0" },
            "conversionRate": 1850.25,
            "currentCurrency": "eur"
        }));

        let ctx = conversion_context(&state, "usd").unwrap();
        assert_eq!(ctx.gas_limit, U256::from(30_000u64));
        assert_eq!(ctx.current_currency, "eur");
        assert_eq!(ctx.conversion_rate, Some(BigDecimal::from_str("1850.25").unwrap()));
    }

    #[test]
    fn test_context_defaults() {
        let state = snapshot(serde_json::json!({
            "send": { "gasLimit": "0x5208" }
        }));

        let ctx = conversion_context(&state, "usd").unwrap();
        assert_eq!(ctx.gas_limit, U256::from(21_000u64));
        assert_eq!(ctx.current_currency, "usd");
        assert_eq!(ctx.conversion_rate, None);
    }

    #[test]
    fn test_malformed_rate_is_rejected() {
        let state = snapshot(serde_json::json!({ "conversionRate": "lots" }));
        assert!(matches!(
            conversion_context(&state, "usd"),
            Err(GasRendererError::InvalidNumericFormat { .. })
        ));
    }
}
