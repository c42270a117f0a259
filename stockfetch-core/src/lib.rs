//! stockfetch core: historical daily closes from AlphaVantage, IEXCloud or Quandl.
//!
//! - Provider adapters behind the `PriceProvider` trait
//! - Provider-native daily records carried as a tagged union
//! - Inclusive year-range filtering
//! - Headerless `date,close` CSV export
//! - A single-shot pipeline tying them together

pub mod config;
pub mod data;
pub mod export;
pub mod pipeline;

pub use config::RequestConfig;
pub use data::{
    build_provider, FetchError, FetchResult, PriceProvider, PriceRow, ProviderKind, RawRecord,
    RecordSet, YearRange,
};
pub use pipeline::{run, RunSummary};
