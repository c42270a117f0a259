//! Request configuration for a single run.

use crate::data::{FetchError, ProviderKind, YearRange};
use std::fmt;
use std::path::PathBuf;

/// Everything one run needs: credentials, symbol, service, year range and output path.
///
/// Built once from command-line input and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub api_key: String,
    pub symbol: String,
    pub provider: ProviderKind,
    pub range: YearRange,
    pub output: PathBuf,
}

impl RequestConfig {
    /// Validate raw inputs into a config.
    ///
    /// Key and symbol must be non-blank; years must be `YYYY`.
    pub fn new(
        api_key: impl Into<String>,
        symbol: impl Into<String>,
        provider: ProviderKind,
        start_year: &str,
        end_year: &str,
        output: impl Into<PathBuf>,
    ) -> Result<Self, FetchError> {
        let api_key = api_key.into();
        let symbol = symbol.into();
        if api_key.trim().is_empty() {
            return Err(FetchError::Config("API key must not be empty".into()));
        }
        if symbol.trim().is_empty() {
            return Err(FetchError::Config("symbol must not be empty".into()));
        }

        Ok(Self {
            api_key,
            symbol,
            provider,
            range: YearRange::new(start_year, end_year)?,
            output: output.into(),
        })
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("api_key", &"***")
            .field("symbol", &self.symbol)
            .field("provider", &self.provider)
            .field("range", &self.range)
            .field("output", &self.output)
            .finish()
    }
}
