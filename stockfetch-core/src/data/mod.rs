//! Provider adapters and the daily record model.

pub mod alpha_vantage;
mod http;
pub mod iex_cloud;
pub mod provider;
pub mod quandl;
pub mod range;
pub mod record;

pub use alpha_vantage::{AlphaVantageDay, AlphaVantageProvider};
pub use iex_cloud::{IexCloudDay, IexCloudProvider};
pub use provider::{FetchError, FetchResult, PriceProvider, ProviderKind};
pub use quandl::{QuandlProvider, QuandlRow};
pub use range::YearRange;
pub use record::{PriceRow, RawRecord, RecordSet};

/// Build the provider for `kind`, authenticated with `api_key`.
pub fn build_provider(
    kind: ProviderKind,
    api_key: &str,
) -> Result<Box<dyn PriceProvider>, FetchError> {
    Ok(match kind {
        ProviderKind::AlphaVantage => Box::new(AlphaVantageProvider::new(api_key)?),
        ProviderKind::IexCloud => Box::new(IexCloudProvider::new(api_key)?),
        ProviderKind::Quandl => Box::new(QuandlProvider::new(api_key)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_builds_matching_provider() {
        for kind in ProviderKind::ALL {
            let provider = build_provider(kind, "key").unwrap();
            assert_eq!(provider.kind(), kind);
            assert_eq!(provider.name(), kind.as_str());
        }
    }
}
