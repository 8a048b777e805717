use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::error::GasRendererError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testnet,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,

    // Snapshot source; None reads stdin
    pub state_path: Option<PathBuf>,

    // Fiat code used when the snapshot carries none
    pub default_currency: String,

    pub pretty_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            state_path: None,
            default_currency: "usd".to_string(),
            pretty_output: true,
        }
    }
}

impl Config {
    /// `from_env` with failures reported as `GasRendererError::ConfigError`.
    pub fn load() -> crate::error::Result<Self> {
        Self::from_env().map_err(GasRendererError::config)
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let environment = Self::parse_environment(
            &std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        )
        .context("Invalid ENVIRONMENT")?;

        let config = Self {
            environment,
            state_path: Self::parse_state_path(std::env::var("GAS_STATE_PATH").ok()),
            default_currency: std::env::var("DEFAULT_CURRENCY")
                .unwrap_or_else(|_| "usd".to_string()),
            pretty_output: std::env::var("OUTPUT_PRETTY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("Invalid OUTPUT_PRETTY")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn parse_environment(env: &str) -> Result<Environment> {
        match env.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testnet" | "test" => Ok(Environment::Testnet),
            "production" | "prod" => Ok(Environment::Production),
            _ => bail!("Unknown environment: {}", env),
        }
    }

    /// `-` and empty values mean stdin.
    pub fn parse_state_path(value: Option<String>) -> Option<PathBuf> {
        value
            .filter(|path| !path.is_empty() && path != "-")
            .map(PathBuf::from)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_currency.is_empty()
            || !self.default_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            bail!(
                "DEFAULT_CURRENCY must be an alphabetic currency code, got {:?}",
                self.default_currency
            );
        }

        if let Some(path) = &self.state_path {
            if path.is_dir() {
                bail!("GAS_STATE_PATH points at a directory: {}", path.display());
            }
        }

        tracing::info!(
            "Configuration validated for {:?} environment",
            self.environment
        );

        Ok(())
    }
}
