//! IEXCloud data provider.
//!
//! Fetches the `chart/max` series: a JSON array of per-day objects, oldest first.
//! Unknown symbols and bad tokens come back as non-2xx responses with a plain
//! text body.

use super::http;
use super::provider::{foreign_record, FetchError, FetchResult, PriceProvider, ProviderKind};
use super::range::YearRange;
use super::record::{present, PriceRow, RawRecord, RecordSet};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Number;

const BASE_URL: &str = "https://cloud.iexapis.com";

/// One element of the IEXCloud chart array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IexCloudDay {
    pub date: String,
    #[serde(default)]
    pub open: Option<Number>,
    #[serde(default)]
    pub high: Option<Number>,
    #[serde(default)]
    pub low: Option<Number>,
    /// `Some(None)` when the day carries `"close": null`.
    #[serde(default, deserialize_with = "present")]
    pub close: Option<Option<Number>>,
    #[serde(default)]
    pub volume: Option<Number>,
}

/// IEXCloud data provider.
pub struct IexCloudProvider {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl IexCloudProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self {
            client: http::client()?,
            api_key: api_key.into(),
            base_url: http::parse_base_url(BASE_URL)?,
        })
    }

    /// Point the provider at a different host (used by tests).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, FetchError> {
        self.base_url = http::parse_base_url(base_url)?;
        Ok(self)
    }

    /// Parse a response body into the full, unfiltered record set.
    pub fn parse_response(body: &str) -> Result<RecordSet, FetchError> {
        let days: Vec<IexCloudDay> = http::parse_json(body)?;
        let records = days.into_iter().map(RawRecord::IexCloud).collect();
        Ok(RecordSet::new(ProviderKind::IexCloud, records))
    }
}

impl PriceProvider for IexCloudProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::IexCloud
    }

    fn endpoint(&self, symbol: &str, _range: &YearRange) -> Result<Url, FetchError> {
        let mut url =
            http::with_segments(&self.base_url, &["stable", "stock", symbol, "chart", "max"])?;
        url.query_pairs_mut().append_pair("token", &self.api_key);
        Ok(url)
    }

    fn fetch(&self, symbol: &str, range: &YearRange) -> Result<FetchResult, FetchError> {
        let url = self.endpoint(symbol, range)?;
        let (status, body) = http::get(&self.client, url, &self.api_key)?;
        http::ensure_success(status, &body)?;

        let all = Self::parse_response(&body)?;
        let fetched = all.len();
        let records = all.filter_years(range);
        log::info!(
            "{symbol}: {fetched} daily records from {}, {} in {}..={}",
            self.name(),
            records.len(),
            range.start(),
            range.end()
        );

        Ok(FetchResult {
            symbol: symbol.to_string(),
            fetched,
            records,
        })
    }

    fn decode_row(&self, record: &RawRecord) -> Result<PriceRow, FetchError> {
        match record {
            RawRecord::IexCloud(day) => {
                let close = day.close.as_ref().ok_or_else(|| {
                    FetchError::Schema(format!("record {} has no \"close\"", day.date))
                })?;
                Ok(PriceRow {
                    date: day.date.clone(),
                    close: close.as_ref().map(Number::to_string).unwrap_or_default(),
                })
            }
            other => Err(foreign_record(self, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> IexCloudProvider {
        IexCloudProvider::new("pk_test").unwrap()
    }

    #[test]
    fn endpoint_puts_symbol_in_path() {
        let range = YearRange::new("2020", "2021").unwrap();
        let url = provider().endpoint("AAPL", &range).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cloud.iexapis.com/stable/stock/AAPL/chart/max?token=pk_test"
        );
    }

    #[test]
    fn parses_chart_and_filters_to_range() {
        let body = r#"[{"date":"2021-03-01","close":200},{"date":"2019-01-01","close":150}]"#;
        let set = IexCloudProvider::parse_response(body).unwrap();
        assert_eq!(set.len(), 2);

        let filtered = set.filter_years(&YearRange::new("2020", "2021").unwrap());
        assert_eq!(filtered.len(), 1);
        let row = provider().decode_row(&filtered.records()[0]).unwrap();
        assert_eq!(row.date, "2021-03-01");
        assert_eq!(row.close, "200");
    }

    #[test]
    fn decimal_close_keeps_json_text() {
        let body = r#"[{"date":"2020-05-04","open":1.5,"close":293.16,"volume":33392017}]"#;
        let set = IexCloudProvider::parse_response(body).unwrap();
        let row = provider().decode_row(&set.records()[0]).unwrap();
        assert_eq!(row.close, "293.16");
    }

    #[test]
    fn error_object_instead_of_array_is_schema_error() {
        let body = r#"{"error": "Unknown symbol"}"#;
        assert!(matches!(
            IexCloudProvider::parse_response(body),
            Err(FetchError::Schema(_))
        ));
    }

    #[test]
    fn day_without_date_is_schema_error() {
        let body = r#"[{"close": 10}]"#;
        assert!(matches!(
            IexCloudProvider::parse_response(body),
            Err(FetchError::Schema(_))
        ));
    }

    #[test]
    fn plain_text_body_is_decode_error() {
        assert!(matches!(
            IexCloudProvider::parse_response("Unknown symbol"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn missing_close_fails_at_decode() {
        let set = IexCloudProvider::parse_response(r#"[{"date":"2020-01-02","open":1}]"#).unwrap();
        assert!(matches!(
            provider().decode_row(&set.records()[0]),
            Err(FetchError::Schema(_))
        ));
    }

    #[test]
    fn null_close_decodes_to_empty_cell() {
        let set =
            IexCloudProvider::parse_response(r#"[{"date":"2021-03-01","close":null}]"#).unwrap();
        match &set.records()[0] {
            RawRecord::IexCloud(day) => assert_eq!(day.close, Some(None)),
            other => panic!("unexpected record {other:?}"),
        }
        let row = provider().decode_row(&set.records()[0]).unwrap();
        assert_eq!(row.date, "2021-03-01");
        assert_eq!(row.close, "");
    }
}
