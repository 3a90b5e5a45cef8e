//! Year-month value type

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month.
///
/// Displays in the remote's period form `YYYY/MM`; bookmarks use `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a month, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(Error::invalid_date(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing the given instant
    pub fn of(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
        }
    }

    /// The current calendar month (UTC)
    pub fn current() -> Self {
        Self::of(Utc::now())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month
    pub fn succ(self) -> Self {
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

    /// Parse a configured start date.
    ///
    /// Accepts `YYYY-MM`, or a full ISO date / datetime which is truncated to its month.
    pub fn parse_start(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(ym) = parse_pair(s, '-') {
            return Ok(ym);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Self::new(dt.year(), dt.month());
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Self::new(ndt.year(), ndt.month());
            }
        }
        if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Self::new(nd.year(), nd.month());
        }

        Err(Error::invalid_date(s))
    }

    /// Parse the remote's `YYYY/MM` period form
    pub fn parse_period(s: &str) -> Result<Self> {
        parse_pair(s.trim(), '/').ok_or_else(|| Error::invalid_date(s))
    }

    /// Bookmark form, `YYYY-MM`
    pub fn to_bookmark(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Digits only, `YYYYMM`
    pub fn digits(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

/// Parse exactly `YYYY<sep>MM`
fn parse_pair(s: &str, sep: char) -> Option<YearMonth> {
    let (year, month) = s.split_once(sep)?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    YearMonth::new(year.parse().ok()?, month.parse().ok()?).ok()
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_start(s)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bookmark())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_start(&s).map_err(serde::de::Error::custom)
    }
}
