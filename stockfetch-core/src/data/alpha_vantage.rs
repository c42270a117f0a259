//! AlphaVantage data provider.
//!
//! Fetches the full daily adjusted time series from the `TIME_SERIES_DAILY_ADJUSTED`
//! endpoint. The series is a JSON object keyed by date; entries are kept in the
//! order the response lists them.
//!
//! AlphaVantage reports bad symbols, bad keys and throttling in-band with HTTP 200
//! and an `"Error Message"`, `"Note"` or `"Information"` field instead of the series.

use super::http;
use super::provider::{foreign_record, FetchError, FetchResult, PriceProvider, ProviderKind};
use super::range::YearRange;
use super::record::{present, PriceRow, RawRecord, RecordSet};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

const BASE_URL: &str = "https://www.alphavantage.co";
const SERIES_KEY: &str = "Time Series (Daily)";

/// `TIME_SERIES_DAILY_ADJUSTED` response.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)", default, deserialize_with = "ordered_series")]
    time_series: Option<Vec<(String, AlphaVantageDay)>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

/// One day of the AlphaVantage series. Values are decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AlphaVantageDay {
    #[serde(rename = "1. open")]
    pub open: Option<String>,
    #[serde(rename = "2. high")]
    pub high: Option<String>,
    #[serde(rename = "3. low")]
    pub low: Option<String>,
    /// `Some(None)` when the day carries `"4. close": null`.
    #[serde(rename = "4. close", default, deserialize_with = "present")]
    pub close: Option<Option<String>>,
    #[serde(rename = "5. adjusted close")]
    pub adjusted_close: Option<String>,
    #[serde(rename = "6. volume")]
    pub volume: Option<String>,
}

/// Deserialize the date-keyed series into a list that keeps document order.
fn ordered_series<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<(String, AlphaVantageDay)>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SeriesVisitor;

    impl<'de> Visitor<'de> for SeriesVisitor {
        type Value = Vec<(String, AlphaVantageDay)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of daily values keyed by date")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut days = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, AlphaVantageDay>()? {
                days.push(entry);
            }
            Ok(days)
        }
    }

    deserializer.deserialize_map(SeriesVisitor).map(Some)
}

/// AlphaVantage data provider.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl AlphaVantageProvider {
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
        let resp: TimeSeriesResponse = http::parse_json(body)?;

        let series = resp.time_series.ok_or_else(|| {
            let reason = resp
                .error_message
                .or(resp.note)
                .or(resp.information)
                .unwrap_or_else(|| "field absent".into());
            FetchError::Schema(format!("missing \"{SERIES_KEY}\": {reason}"))
        })?;

        let records = series
            .into_iter()
            .map(|(date, day)| RawRecord::AlphaVantage { date, day })
            .collect();
        Ok(RecordSet::new(ProviderKind::AlphaVantage, records))
    }
}

impl PriceProvider for AlphaVantageProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AlphaVantage
    }

    fn endpoint(&self, symbol: &str, _range: &YearRange) -> Result<Url, FetchError> {
        let mut url = http::with_segments(&self.base_url, &["query"])?;
        url.query_pairs_mut()
            .append_pair("function", "TIME_SERIES_DAILY_ADJUSTED")
            .append_pair("symbol", symbol)
            .append_pair("apikey", &self.api_key)
            .append_pair("outputsize", "full");
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
            RawRecord::AlphaVantage { date, day } => {
                let close = day.close.clone().ok_or_else(|| {
                    FetchError::Schema(format!("record {date} has no \"4. close\""))
                })?;
                Ok(PriceRow {
                    date: date.clone(),
                    close: close.unwrap_or_default(),
                })
            }
            other => Err(foreign_record(self, other)),
        }
    }
}
