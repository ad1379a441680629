//! Domain model for a ledger period: one calendar month of transactions.
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::ValidationError;

/// Monthly ledger bucket, written as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LedgerPeriod {
    year: i32,
    month: u32,
}

impl LedgerPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ValidationError::InvalidPeriod(format!("{:04}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// The bucket a calendar day belongs to
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Every bucket touched by the inclusive date range, oldest first
    pub fn covering(start: NaiveDate, end: NaiveDate) -> Vec<Self> {
        let mut periods = Vec::new();
        if start > end {
            return periods;
        }
        let last = Self::containing(end);
        let mut current = Self::containing(start);
        while current <= last {
            periods.push(current);
            current = current.next();
        }
        periods
    }
}

/// Parse an ISO calendar date (`YYYY-MM-DD`)
pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

impl fmt::Display for LedgerPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for LedgerPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ValidationError::InvalidPeriod(trimmed.to_string());

        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let period: LedgerPeriod = "2026-10".parse().unwrap();
        assert_eq!(period.year(), 2026);
        assert_eq!(period.month(), 10);
        assert_eq!(period.to_string(), "2026-10");
    }

    #[test]
    fn test_parse_rejects_malformed_periods() {
        assert!("2026-13".parse::<LedgerPeriod>().is_err());
        assert!("2026-1".parse::<LedgerPeriod>().is_err());
        assert!("October".parse::<LedgerPeriod>().is_err());
        assert!("".parse::<LedgerPeriod>().is_err());
    }

    #[test]
    fn test_month_boundaries() {
        let feb = LedgerPeriod::new(2028, 2).unwrap();
        assert_eq!(feb.first_day(), date(2028, 2, 1));
        assert_eq!(feb.last_day(), date(2028, 2, 29));

        let dec = LedgerPeriod::new(2026, 12).unwrap();
        assert_eq!(dec.next().to_string(), "2027-01");
        assert_eq!(dec.last_day(), date(2026, 12, 31));
    }

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(parse_calendar_date(" 2026-10-05 ").unwrap(), date(2026, 10, 5));
        assert_eq!(
            parse_calendar_date("05/10/2026"),
            Err(ValidationError::InvalidDate("05/10/2026".to_string()))
        );
        assert!(parse_calendar_date("2026-02-30").is_err());
    }

    #[test]
    fn test_covering_spans_year_end() {
        let periods = LedgerPeriod::covering(date(2026, 11, 20), date(2027, 1, 5));
        let ids: Vec<String> = periods.iter().map(|p| p.to_string()).collect();
        assert_eq!(ids, vec!["2026-11", "2026-12", "2027-01"]);

        assert!(LedgerPeriod::covering(date(2026, 11, 20), date(2026, 11, 1)).is_empty());
    }
}
