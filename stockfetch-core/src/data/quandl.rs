//! Quandl data provider.
//!
//! Reads the WIKI dataset for a symbol. Rows are positional arrays laid out as
//! `[date, open, high, low, close, volume, ...]`. The year range is passed to
//! the server as `start_date`/`end_date` and applied again locally.

use super::http;
use super::provider::{foreign_record, FetchError, FetchResult, PriceProvider, ProviderKind};
use super::range::YearRange;
use super::record::{PriceRow, RawRecord, RecordSet};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

const BASE_URL: &str = "https://www.quandl.com";
const DATE_POS: usize = 0;
const CLOSE_POS: usize = 4;

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    dataset: Option<Dataset>,
    quandl_error: Option<QuandlError>,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    data: Option<Vec<Vec<Value>>>,
}

#[derive(Debug, Deserialize)]
struct QuandlError {
    code: String,
    message: String,
}

/// One positional row of a Quandl dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct QuandlRow {
    date: String,
    fields: Vec<Value>,
}

impl QuandlRow {
    /// Wrap a raw row, requiring a string date at position 0.
    pub fn new(fields: Vec<Value>) -> Result<Self, FetchError> {
        let date = match fields.get(DATE_POS) {
            Some(Value::String(date)) => date.clone(),
            Some(other) => {
                return Err(FetchError::Schema(format!(
                    "dataset row has non-string date {other}"
                )))
            }
            None => return Err(FetchError::Schema("dataset row is empty".into())),
        };
        Ok(Self { date, fields })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// Close price at position 4, as text. A `null` close is empty.
    pub fn close(&self) -> Result<String, FetchError> {
        match self.fields.get(CLOSE_POS) {
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(FetchError::Schema(format!(
                "record {} has non-numeric close {other}",
                self.date
            ))),
            None => Err(FetchError::Schema(format!(
                "record {} has {} fields, close is at position {CLOSE_POS}",
                self.date,
                self.fields.len()
            ))),
        }
    }
}

/// Quandl data provider.
pub struct QuandlProvider {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl QuandlProvider {
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
        let resp: DatasetResponse = http::parse_json(body)?;

        let dataset = match (resp.dataset, resp.quandl_error) {
            (Some(dataset), _) => dataset,
            (None, Some(err)) => {
                return Err(FetchError::Schema(format!(
                    "missing \"dataset\": {} ({})",
                    err.message, err.code
                )))
            }
            (None, None) => return Err(FetchError::Schema("missing \"dataset\"".into())),
        };
        let rows = dataset
            .data
            .ok_or_else(|| FetchError::Schema("missing \"dataset.data\"".into()))?;

        let records = rows
            .into_iter()
            .map(|fields| QuandlRow::new(fields).map(RawRecord::Quandl))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RecordSet::new(ProviderKind::Quandl, records))
    }
}

impl PriceProvider for QuandlProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Quandl
    }

    fn endpoint(&self, symbol: &str, range: &YearRange) -> Result<Url, FetchError> {
        let dataset = format!("{symbol}.json");
        let mut url = http::with_segments(
            &self.base_url,
            &["api", "v3", "datasets", "WIKI", dataset.as_str()],
        )?;
        url.query_pairs_mut()
            .append_pair("start_date", &range.first_day().format("%Y-%m-%d").to_string())
            .append_pair("end_date", &range.last_day().format("%Y-%m-%d").to_string())
            .append_pair("api_key", &self.api_key);
        Ok(url)
    }

    fn fetch(&self, symbol: &str, range: &YearRange) -> Result<FetchResult, FetchError> {
        let url = self.endpoint(symbol, range)?;
        let (status, body) = http::get(&self.client, url, &self.api_key)?;

        // Quandl explains 4xx responses with a JSON `quandl_error` body.
        let all = match Self::parse_response(&body) {
            Ok(all) => {
                http::ensure_success(status, &body)?;
                all
            }
            Err(err @ FetchError::Schema(_)) if !status.is_success() => return Err(err),
            Err(err) => {
                http::ensure_success(status, &body)?;
                return Err(err);
            }
        };

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
            RawRecord::Quandl(row) => Ok(PriceRow {
                date: row.date.clone(),
                close: row.close()?,
            }),
            other => Err(foreign_record(self, other)),
        }
    }
}
