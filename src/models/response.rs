use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::GasErrors;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub data_source: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderableGasEstimate {
    pub fee_in_primary_currency: String,
    pub fee_in_secondary_currency: String,
    pub time_estimate: String,
    pub price_in_hex_wei: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonGroupProps {
    pub button_data_loading: bool,
    pub default_active_button_index: Option<usize>,
    pub gas_button_info: Vec<RenderableGasEstimate>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InfoRowProps {
    pub original_total_fiat: String,
    pub original_total_eth: String,
    pub new_total_fiat: String,
    pub new_total_eth: String,
    pub transaction_fee: String,
    pub send_amount: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GasModalView {
    pub hide_basic: bool,
    pub custom_modal_gas_price_in_hex: String,
    pub custom_modal_gas_limit_in_hex: String,
    pub custom_gas_price: String,
    pub custom_gas_limit: u64,
    pub new_total_fiat: String,
    pub gas_price_button_group_props: ButtonGroupProps,
    pub info_row_props: InfoRowProps,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GasView {
    pub estimates: Vec<RenderableGasEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal: Option<GasModalView>,
    pub errors: GasErrors,
}
