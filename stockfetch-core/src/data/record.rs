//! Daily records in each provider's native shape, and the rows written out.

use super::alpha_vantage::AlphaVantageDay;
use super::iex_cloud::IexCloudDay;
use super::provider::ProviderKind;
use super::quandl::QuandlRow;
use super::range::YearRange;
use serde::{Deserialize, Deserializer, Serialize};

/// One trading day as returned by a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    /// Entry of AlphaVantage's date-keyed time series.
    AlphaVantage { date: String, day: AlphaVantageDay },
    /// Element of IEXCloud's chart array.
    IexCloud(IexCloudDay),
    /// Positional row of a Quandl dataset.
    Quandl(QuandlRow),
}

impl RawRecord {
    pub fn date(&self) -> &str {
        match self {
            RawRecord::AlphaVantage { date, .. } => date,
            RawRecord::IexCloud(day) => &day.date,
            RawRecord::Quandl(row) => row.date(),
        }
    }

    /// The provider whose response this record came from.
    pub fn source(&self) -> ProviderKind {
        match self {
            RawRecord::AlphaVantage { .. } => ProviderKind::AlphaVantage,
            RawRecord::IexCloud(_) => ProviderKind::IexCloud,
            RawRecord::Quandl(_) => ProviderKind::Quandl,
        }
    }
}

/// Records from a single provider response, in response order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    source: ProviderKind,
    records: Vec<RawRecord>,
}

impl RecordSet {
    pub fn new(source: ProviderKind, records: Vec<RawRecord>) -> Self {
        debug_assert!(records.iter().all(|r| r.source() == source));
        Self { source, records }
    }

    pub fn source(&self) -> ProviderKind {
        self.source
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop records whose date falls outside `range`, keeping order.
    pub fn filter_years(mut self, range: &YearRange) -> Self {
        self.records.retain(|r| range.contains(r.date()));
        self
    }
}

/// Field deserializer that keeps an explicit `null` apart from an absent key.
///
/// Pair with `#[serde(default)]` on an `Option<Option<T>>` field: absent gives
/// `None`, `null` gives `Some(None)`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// One output line: trading date and closing price.
///
/// The close is kept as text so the provider's own formatting is preserved.
/// A close the provider sent as `null` is written as an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRow {
    pub date: String,
    pub close: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iex(date: &str) -> RawRecord {
        RawRecord::IexCloud(IexCloudDay {
            date: date.into(),
            ..Default::default()
        })
    }

    #[test]
    fn filter_keeps_order_and_subset() {
        let set = RecordSet::new(
            ProviderKind::IexCloud,
            vec![iex("2021-03-01"), iex("2019-01-01"), iex("2020-07-04"), iex("2022-01-03")],
        );
        let range = YearRange::new("2020", "2021").unwrap();
        let filtered = set.clone().filter_years(&range);

        let dates: Vec<&str> = filtered.records().iter().map(|r| r.date()).collect();
        assert_eq!(dates, vec!["2021-03-01", "2020-07-04"]);
        assert!(filtered.len() <= set.len());
        assert_eq!(filtered.source(), ProviderKind::IexCloud);
    }

    #[test]
    fn filter_can_empty_the_set() {
        let set = RecordSet::new(ProviderKind::IexCloud, vec![iex("1999-01-04")]);
        let filtered = set.filter_years(&YearRange::new("2000", "2001").unwrap());
        assert!(filtered.is_empty());
    }
}
