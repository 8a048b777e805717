use bigdecimal::BigDecimal;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

use crate::models::NumericBase;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawNumeric {
    Text(String),
    Number(serde_json::Number),
}

/// A number as it arrives in a snapshot: either a JSON number or a numeric
/// string, kept verbatim until the conversion engine parses it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawNumeric")]
pub struct NumericString(String);

impl From<RawNumeric> for NumericString {
    fn from(raw: RawNumeric) -> Self {
        match raw {
            RawNumeric::Text(text) => NumericString(text),
            RawNumeric::Number(number) => NumericString(number.to_string()),
        }
    }
}

impl NumericString {
    pub fn new(value: impl Into<String>) -> Self {
        NumericString(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x`-prefixed values are hex, everything else decimal.
    pub fn base(&self) -> NumericBase {
        let trimmed = self.0.trim_start_matches('-');
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            NumericBase::Hex
        } else {
            NumericBase::Dec
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GasEstimateTier {
    Fast,
    Average,
    SafeLow,
}

impl GasEstimateTier {
    /// Display order of the speed buttons.
    pub const ALL: [GasEstimateTier; 3] = [
        GasEstimateTier::Fast,
        GasEstimateTier::Average,
        GasEstimateTier::SafeLow,
    ];

    pub fn price_key(&self) -> &'static str {
        match self {
            GasEstimateTier::Fast => "fast",
            GasEstimateTier::Average => "average",
            GasEstimateTier::SafeLow => "safeLow",
        }
    }

    pub fn wait_key(&self) -> &'static str {
        match self {
            GasEstimateTier::Fast => "fastWait",
            GasEstimateTier::Average => "avgWait",
            GasEstimateTier::SafeLow => "safeLowWait",
        }
    }
}

/// Raw numbers from the gas station feed. Decimal prices are in tenths of a
/// GWEI and `0x` prices in WEI; waits are in blocks, block time in seconds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicEstimates {
    pub safe_low: Option<NumericString>,
    pub average: Option<NumericString>,
    pub fast: Option<NumericString>,
    pub block_time: Option<NumericString>,
    pub safe_low_wait: Option<NumericString>,
    pub avg_wait: Option<NumericString>,
    pub fast_wait: Option<NumericString>,
}

impl BasicEstimates {
    pub fn price(&self, tier: GasEstimateTier) -> Option<&NumericString> {
        match tier {
            GasEstimateTier::Fast => self.fast.as_ref(),
            GasEstimateTier::Average => self.average.as_ref(),
            GasEstimateTier::SafeLow => self.safe_low.as_ref(),
        }
    }

    pub fn wait(&self, tier: GasEstimateTier) -> Option<&NumericString> {
        match tier {
            GasEstimateTier::Fast => self.fast_wait.as_ref(),
            GasEstimateTier::Average => self.avg_wait.as_ref(),
            GasEstimateTier::SafeLow => self.safe_low_wait.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomGasData {
    pub limit: Option<U256>,
    pub price: Option<U256>,
    pub total: Option<U256>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GasErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GasState {
    pub basic_estimates: BasicEstimates,
    pub custom_data: CustomGasData,
    pub basic_estimate_is_loading: bool,
    pub errors: GasErrors,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendState {
    pub gas_limit: U256,
    pub gas_price: Option<U256>,
    pub amount: U256,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxParams {
    pub gas: U256,
    pub gas_price: U256,
    #[serde(default)]
    pub value: U256,
}

/// The slice of wallet state the gas views are computed from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSnapshot {
    pub gas: GasState,
    pub current_currency: Option<String>,
    pub conversion_rate: Option<NumericString>,
    pub send: SendState,
    pub tx_params: Option<TxParams>,
    pub hide_basic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionContext {
    pub conversion_rate: Option<BigDecimal>,
    pub current_currency: String,
    pub gas_limit: U256,
}
