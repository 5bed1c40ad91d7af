use std::{
    fmt::{self, Display},
    str::FromStr,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools as _;

use crate::{error::AccountingError, lsf::format_date_for_lsf};

/// Date-only shapes tried in order. Earlier entries win on ambiguous input.
///
/// (see https://docs.rs/chrono/latest/chrono/format/strftime/index.html for more)
const DATE_FORMATS: [&str; 9] = [
    "%Y/%m/%d",
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d %B %Y",
    "%B %d %Y",
    "%d-%B-%Y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

/// Query window for `bacct -C`. `start <= end` is not checked, bacct gets whatever it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Interval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `start,end`, each side in any of the accepted date shapes.
    pub fn parse(raw: &str) -> Result<Self, AccountingError> {
        let invalid = |reason: String| AccountingError::InvalidInterval {
            input: raw.to_owned(),
            reason,
        };

        let tokens = raw.split(',').map(str::trim).collect_vec();
        match tokens.as_slice() {
            &[start, end] => Ok(Self {
                start: parse_date(start).ok_or_else(|| invalid(format!("`{start}` is not a date")))?,
                end: parse_date(end).ok_or_else(|| invalid(format!("`{end}` is not a date")))?,
            }),
            x => Err(invalid(format!("expected `start,end`, got {} field(s)", x.len()))),
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn start_for_lsf(&self) -> String {
        format_date_for_lsf(self.start)
    }

    pub fn end_for_lsf(&self) -> String {
        format_date_for_lsf(self.end)
    }
}

impl FromStr for Interval {
    type Err = AccountingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `YYYY/MM/DD,YYYY/MM/DD`, the exact argument of `bacct -C`.
impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start_for_lsf(), self.end_for_lsf())
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
    {
        return Some(date);
    }
    if let Some(datetime) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Some(datetime.date());
    }
    // keeps the local date of the given offset, no conversion to UTC
    DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.date_naive())
}
