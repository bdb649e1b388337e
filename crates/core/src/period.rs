use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive date window. Either bound may be missing while the user is
/// still filling the form in; a range with a missing bound filters nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from, self.to) {
            (Some(from), Some(to)) => write!(f, "{from} to {to}"),
            (Some(from), None) => write!(f, "{from} to ?"),
            (None, Some(to)) => write!(f, "? to {to}"),
            (None, None) => write!(f, "all dates"),
        }
    }
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        DateRange {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn unbounded() -> Self {
        DateRange::default()
    }

    /// Builds a range from `YYYY-MM-DD` form input. Blank or malformed
    /// input leaves that bound absent.
    pub fn parse_bounds(from: Option<&str>, to: Option<&str>) -> Self {
        DateRange {
            from: from.and_then(parse_input_date),
            to: to.and_then(parse_input_date),
        }
    }

    /// Both bounds, when present.
    pub fn bounds(self) -> Option<(NaiveDate, NaiveDate)> {
        self.from.zip(self.to)
    }

    /// True when both bounds are present and `from` is after `to`.
    pub fn is_inverted(self) -> bool {
        self.bounds().is_some_and(|(from, to)| from > to)
    }
}

fn parse_input_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
