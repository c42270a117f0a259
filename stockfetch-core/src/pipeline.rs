//! Fetch → filter → write, for one symbol and one provider.

use crate::config::RequestConfig;
use crate::data::{FetchError, PriceProvider};
use crate::export::write_closes;
use std::path::PathBuf;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    /// Records in the provider response before year filtering.
    pub fetched: usize,
    /// Rows written; equals the filtered record count.
    pub rows: usize,
}

/// Run the pipeline with an already-selected provider.
///
/// The output file is only opened once the response has been fetched, parsed,
/// filtered and decoded.
pub fn run(config: &RequestConfig, provider: &dyn PriceProvider) -> Result<RunSummary, FetchError> {
    if provider.kind() != config.provider {
        return Err(FetchError::Config(format!(
            "configured for {} but given the {} provider",
            config.provider,
            provider.name()
        )));
    }

    let result = provider.fetch(&config.symbol, &config.range)?;
    if result.records.is_empty() {
        log::warn!(
            "{}: no records between {} and {}",
            result.symbol,
            config.range.start(),
            config.range.end()
        );
    }

    let rows = write_closes(&config.output, provider, &result.records)?;
    Ok(RunSummary {
        output: config.output.clone(),
        fetched: result.fetched,
        rows,
    })
}
