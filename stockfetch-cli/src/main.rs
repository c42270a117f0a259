//! stockfetch CLI: download daily closing prices for one symbol into a CSV file.
//!
//! Example:
//!   stockfetch --key $KEY --symbol IBM --service AlphaVantage \
//!       --start 2019 --end 2020 --output ibm.csv
//!
//! Set `RUST_LOG=info` (or `debug`) for progress output on stderr.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use stockfetch_core::{build_provider, pipeline, ProviderKind, RequestConfig};

#[derive(Parser, Debug)]
#[command(name = "stockfetch", about = "Fetch stock data", version)]
struct Cli {
    /// API key.
    #[arg(long)]
    key: String,

    /// Stock symbol.
    #[arg(long)]
    symbol: String,

    /// Stock data service.
    #[arg(long, value_enum)]
    service: Service,

    /// Start year (YYYY).
    #[arg(long)]
    start: String,

    /// End year (YYYY).
    #[arg(long)]
    end: String,

    /// Output CSV file.
    #[arg(long)]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Service {
    #[value(name = "AlphaVantage")]
    AlphaVantage,
    #[value(name = "IEXCloud")]
    IexCloud,
    #[value(name = "Quandl")]
    Quandl,
}

impl From<Service> for ProviderKind {
    fn from(service: Service) -> Self {
        match service {
            Service::AlphaVantage => ProviderKind::AlphaVantage,
            Service::IexCloud => ProviderKind::IexCloud,
            Service::Quandl => ProviderKind::Quandl,
        }
    }
}

impl Cli {
    fn into_config(self) -> Result<RequestConfig> {
        let config = RequestConfig::new(
            self.key,
            self.symbol,
            self.service.into(),
            &self.start,
            &self.end,
            self.output,
        )?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.into_config().context("invalid arguments")?;
    log::debug!("{config:?}");

    let provider = build_provider(config.provider, &config.api_key)
        .with_context(|| format!("failed to set up {} client", config.provider))?;

    let summary = pipeline::run(&config, provider.as_ref()).with_context(|| {
        format!(
            "failed to save {} prices from {} to {}",
            config.symbol,
            config.provider,
            config.output.display()
        )
    })?;

    log::info!("{} of {} records written", summary.rows, summary.fetched);
    println!("Data saved to {}", summary.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    const FULL: [&str; 13] = [
        "stockfetch",
        "--key",
        "demo",
        "--symbol",
        "IBM",
        "--service",
        "AlphaVantage",
        "--start",
        "2019",
        "--end",
        "2020",
        "--output",
        "ibm.csv",
    ];

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_all_required_flags() {
        let cli = Cli::try_parse_from(FULL).unwrap();
        assert_eq!(cli.service, Service::AlphaVantage);

        let config = cli.into_config().unwrap();
        assert_eq!(config.provider, ProviderKind::AlphaVantage);
        assert_eq!(config.symbol, "IBM");
        assert_eq!(config.range.start(), "2019");
        assert_eq!(config.output, PathBuf::from("ibm.csv"));
    }

    #[test]
    fn every_flag_is_required() {
        for flag in ["--key", "--symbol", "--service", "--start", "--end", "--output"] {
            let pos = FULL.iter().position(|a| *a == flag).unwrap();
            let args: Vec<&str> = FULL
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != pos && *i != pos + 1)
                .map(|(_, a)| *a)
                .collect();
            let err = Cli::try_parse_from(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument, "{flag}");
        }
    }

    #[test]
    fn service_names_are_exact() {
        for (name, kind) in [
            ("AlphaVantage", ProviderKind::AlphaVantage),
            ("IEXCloud", ProviderKind::IexCloud),
            ("Quandl", ProviderKind::Quandl),
        ] {
            let mut args = FULL;
            args[6] = name;
            let cli = Cli::try_parse_from(args).unwrap();
            assert_eq!(ProviderKind::from(cli.service), kind);
        }

        let mut args = FULL;
        args[6] = "Yahoo";
        let err = Cli::try_parse_from(args).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn malformed_year_fails_before_any_request() {
        let mut args = FULL;
        args[8] = "19";
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn missing_argument_creates_no_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("never.csv");
        let out_str = out.to_str().unwrap();
        let result = Cli::try_parse_from([
            "stockfetch", "--key", "demo", "--symbol", "IBM", "--start", "2019", "--end", "2020",
            "--output", out_str,
        ]);
        assert!(result.is_err());
        assert!(!out.exists());
    }
}
