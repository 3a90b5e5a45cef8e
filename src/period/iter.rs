//! Month iteration

use super::YearMonth;
use crate::error::Result;
use std::iter::FusedIterator;

/// Ascending, inclusive walk over calendar months.
///
/// The upper bound is fixed when the iterator is created; a new run has to
/// build a new iterator to pick up a later "now".
#[derive(Debug, Clone)]
pub struct Months {
    next: Option<YearMonth>,
    end: YearMonth,
}

impl Months {
    /// Months from `start` through `end`, both inclusive. Empty when `start > end`.
    pub fn new(start: YearMonth, end: YearMonth) -> Self {
        Self {
            next: (start <= end).then_some(start),
            end,
        }
    }

    /// Last month this iterator will yield
    pub fn end(&self) -> YearMonth {
        self.end
    }
}

impl Iterator for Months {
    type Item = YearMonth;

    fn next(&mut self) -> Option<YearMonth> {
        let current = self.next?;
        self.next = (current < self.end).then(|| current.succ());
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.next.map_or(0, |next| {
            let span = (self.end.year() - next.year()) * 12 + self.end.month() as i32
                - next.month() as i32;
            span as usize + 1
        });
        (n, Some(n))
    }
}

impl ExactSizeIterator for Months {}

impl FusedIterator for Months {}

/// Months from a configured start date through the current month.
///
/// Fails with `InvalidDateFormat` when `start` is not a year-month.
pub fn months_from(start: &str) -> Result<Months> {
    let start = YearMonth::parse_start(start)?;
    Ok(Months::new(start, YearMonth::current()))
}

/// Months from `start` through `end`, inclusive
pub fn months_between(start: YearMonth, end: YearMonth) -> Months {
    Months::new(start, end)
}
