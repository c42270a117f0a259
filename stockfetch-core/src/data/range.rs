//! Inclusive year range used to filter daily records.

use super::provider::FetchError;
use chrono::NaiveDate;

/// Inclusive `[start, end]` range of four-digit years.
///
/// Dates are matched on their first four characters by string comparison,
/// which agrees with numeric order because both bounds are fixed-width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearRange {
    start: String,
    end: String,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl YearRange {
    /// Build a range from two `YYYY` strings.
    ///
    /// A start year after the end year is accepted; the range is then empty.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, FetchError> {
        let start = start.into();
        let end = end.into();
        let first_day = year_boundary(&start, 1, 1)?;
        let last_day = year_boundary(&end, 12, 31)?;

        if start > end {
            log::warn!("start year {start} is after end year {end}; no records will match");
        }

        Ok(Self {
            start,
            end,
            first_day,
            last_day,
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// January 1st of the start year.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// December 31st of the end year.
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Whether the year prefix of `date` lies inside the range.
    pub fn contains(&self, date: &str) -> bool {
        match date.get(..4) {
            Some(year) => self.start.as_str() <= year && year <= self.end.as_str(),
            None => false,
        }
    }
}

fn year_boundary(year: &str, month: u32, day: u32) -> Result<NaiveDate, FetchError> {
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FetchError::Config(format!(
            "year must be four digits (YYYY), got '{year}'"
        )));
    }
    year.parse::<i32>()
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
        .ok_or_else(|| FetchError::Config(format!("year out of range: '{year}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> YearRange {
        YearRange::new(start, end).unwrap()
    }

    #[test]
    fn bounds_are_inclusive() {
        let r = range("2019", "2021");
        assert!(r.contains("2019-01-01"));
        assert!(r.contains("2020-06-15"));
        assert!(r.contains("2021-12-31"));
        assert!(!r.contains("2018-12-31"));
        assert!(!r.contains("2022-01-01"));
    }

    #[test]
    fn single_year_range() {
        let r = range("2020", "2020");
        assert!(r.contains("2020-01-02"));
        assert!(!r.contains("1999-05-01"));
    }

    #[test]
    fn short_or_empty_dates_never_match() {
        let r = range("0000", "9999");
        assert!(!r.contains(""));
        assert!(!r.contains("202"));
        assert!(r.contains("2020"));
    }

    #[test]
    fn inverted_range_is_empty() {
        let r = range("2021", "2019");
        assert!(!r.contains("2020-01-01"));
        assert!(!r.contains("2021-01-01"));
        assert!(!r.contains("2019-01-01"));
    }

    #[test]
    fn rejects_non_four_digit_years() {
        for bad in ["20", "20201", "20a0", "", " 2020", "２０２０"] {
            let err = YearRange::new(bad, "2020").unwrap_err();
            assert!(matches!(err, FetchError::Config(_)), "accepted {bad:?}");
        }
        assert!(YearRange::new("2020", "99").is_err());
    }

    #[test]
    fn day_boundaries() {
        let r = range("2015", "2017");
        assert_eq!(r.first_day(), NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(r.last_day(), NaiveDate::from_ymd_opt(2017, 12, 31).unwrap());
    }
}
