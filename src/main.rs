use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use gas_renderer::{
    config::Config,
    error::ErrorResponse,
    handlers::{read_snapshot, render_gas_view},
    models::{ApiResponse, GasView},
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Renders gas fee estimates and the customize-gas view from a wallet state snapshot
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Snapshot JSON file, `-` for stdin. Overrides GAS_STATE_PATH
    #[arg(value_name = "STATE_PATH")]
    state_path: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(path) = self.state_path {
            config.state_path = Config::parse_state_path(Some(path.to_string_lossy().into_owned()));
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON document
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut pretty_output = Config::default().pretty_output;
    let result = Config::load().and_then(|mut config| {
        cli.apply(&mut config);
        pretty_output = config.pretty_output;

        tracing::info!("Starting gas-renderer v{}", env!("CARGO_PKG_VERSION"));
        tracing::info!("Environment: {:?}", config.environment);

        run(&config)
    });

    match result {
        Ok(response) => {
            println!("{}", to_json(&response, pretty_output)?);
            Ok(())
        }
        Err(err) => {
            let body = ErrorResponse::from(&err);
            println!("{}", to_json(&body, pretty_output)?);
            std::process::exit(1);
        }
    }
}

fn run(config: &Config) -> gas_renderer::error::Result<ApiResponse<GasView>> {
    let snapshot = read_snapshot(config.state_path.as_deref())?;
    render_gas_view(&snapshot, config)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_path_overrides_config() {
        let mut config = Config {
            state_path: Some(PathBuf::from("from-env.json")),
            ..Config::default()
        };
        Cli::try_parse_from(["gas-renderer", "state.json"])
            .unwrap()
            .apply(&mut config);
        assert_eq!(config.state_path, Some(PathBuf::from("state.json")));
    }

    #[test]
    fn test_dash_reads_stdin_and_no_arg_keeps_config() {
        let mut config = Config {
            state_path: Some(PathBuf::from("from-env.json")),
            ..Config::default()
        };
        Cli::try_parse_from(["gas-renderer"]).unwrap().apply(&mut config);
        assert_eq!(config.state_path, Some(PathBuf::from("from-env.json")));

        Cli::try_parse_from(["gas-renderer", "-"])
            .unwrap()
            .apply(&mut config);
        assert_eq!(config.state_path, None);
    }

    #[test]
    fn test_help_is_not_a_path() {
        let err = Cli::try_parse_from(["gas-renderer", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

        let err = Cli::try_parse_from(["gas-renderer", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
