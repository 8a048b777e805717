use crate::{
    config::Config,
    error::{GasRendererError, Result},
    models::{ApiResponse, AppSnapshot, GasView},
    services::{
        gas_modal::build_gas_modal_view,
        selectors::{conversion_context, get_custom_gas_errors, get_renderable_basic_estimate_data},
    },
};
use chrono::Utc;
use std::io::Read;
use std::path::Path;

pub fn parse_snapshot(raw: &str) -> Result<AppSnapshot> {
    Ok(serde_json::from_str(raw)?)
}

/// Reads and parses a snapshot from `path`, or from stdin when `None`.
pub fn read_snapshot(path: Option<&Path>) -> Result<AppSnapshot> {
    let raw = match path {
        Some(path) => {
            tracing::info!("Reading gas state from {}", path.display());
            std::fs::read_to_string(path)?
        }
        None => {
            tracing::info!("Reading gas state from stdin");
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            raw
        }
    };
    parse_snapshot(&raw)
}

pub fn render_gas_view(snapshot: &AppSnapshot, config: &Config) -> Result<ApiResponse<GasView>> {
    let context = conversion_context(snapshot, &config.default_currency)?;
    let estimates = get_renderable_basic_estimate_data(snapshot, &context)?;

    let modal = match build_gas_modal_view(snapshot, &context, &estimates) {
        Ok(modal) => Some(modal),
        Err(GasRendererError::MissingGasPrice) => {
            tracing::debug!("No gas price yet, skipping modal view");
            None
        }
        Err(e) => return Err(e),
    };

    tracing::info!(
        "Rendered {} gas estimates in {}",
        estimates.len(),
        context.current_currency
    );

    Ok(ApiResponse {
        success: true,
        data: GasView {
            estimates,
            modal,
            errors: get_custom_gas_errors(snapshot).clone(),
        },
        timestamp: Utc::now(),
        data_source: "gas-station".to_string(),
    })
}
