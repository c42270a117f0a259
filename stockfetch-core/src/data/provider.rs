//! Price provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over the three market data services so the
//! driver selects one implementation at startup and the writer decodes records
//! through the same value that fetched them.

use super::range::YearRange;
use super::record::{PriceRow, RawRecord, RecordSet};
use reqwest::Url;
use serde_json::error::Category;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Structured error types for fetch and export operations.
///
/// One variant per failure class; nothing in the pipeline retries, so every
/// error surfaces unchanged at the process boundary.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("response is not valid JSON: {0}")]
    Decode(String),

    #[error("unexpected response shape: {0}")]
    Schema(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FetchError {
    /// Classify a `serde_json` failure: malformed text is a decode error,
    /// well-formed JSON of the wrong shape is a schema error.
    pub fn from_json(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => FetchError::Schema(err.to_string()),
            Category::Io | Category::Syntax | Category::Eof => FetchError::Decode(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key.
        FetchError::Network(err.without_url().to_string())
    }
}

impl From<csv::Error> for FetchError {
    fn from(err: csv::Error) -> Self {
        FetchError::Io(err.into())
    }
}

/// The closed set of supported market data services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    AlphaVantage,
    IexCloud,
    Quandl,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::AlphaVantage,
        ProviderKind::IexCloud,
        ProviderKind::Quandl,
    ];

    /// Canonical service name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::AlphaVantage => "AlphaVantage",
            ProviderKind::IexCloud => "IEXCloud",
            ProviderKind::Quandl => "Quandl",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                FetchError::Config(format!(
                    "unknown service '{s}'. Valid: AlphaVantage, IEXCloud, Quandl"
                ))
            })
    }
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    /// Number of daily records in the raw response, before year filtering.
    pub fetched: usize,
    /// Records inside the requested year range, in response order.
    pub records: RecordSet,
}

/// Trait for market data providers (AlphaVantage, IEXCloud, Quandl).
///
/// Implementations own both halves of a provider's contract: how to pull its
/// daily records over HTTP, and how to turn one of those records into an
/// output row.
pub trait PriceProvider: Send + Sync {
    /// Which service this provider talks to.
    fn kind(&self) -> ProviderKind;

    /// Human-readable name of this provider.
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    /// Build the request URL for a symbol and year range.
    fn endpoint(&self, symbol: &str, range: &YearRange) -> Result<Url, FetchError>;

    /// Fetch daily records for a symbol, keeping only those inside `range`.
    fn fetch(&self, symbol: &str, range: &YearRange) -> Result<FetchResult, FetchError>;

    /// Extract the (date, close) pair from one of this provider's records.
    fn decode_row(&self, record: &RawRecord) -> Result<PriceRow, FetchError>;
}

/// Error for a record handed to a provider that did not produce it.
pub(crate) fn foreign_record(provider: &dyn PriceProvider, record: &RawRecord) -> FetchError {
    FetchError::Schema(format!(
        "{} record for {} cannot be decoded by the {} provider",
        record.source(),
        record.date(),
        provider.name()
    ))
}
