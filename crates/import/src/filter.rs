use chrono::{NaiveDateTime, NaiveTime};
use ledgerlens_core::{DateRange, Ledger};
use tracing::debug;

use crate::columns::ColumnRoles;
use crate::date::parse_date_tolerant;

/// The rows of a ledger that fall in a date window.
///
/// Rows are shared with the source ledger, not copied, so the view and
/// the source hold the same row values.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredLedger {
    ledger: Ledger,
    source_indices: Vec<usize>,
}

impl FilteredLedger {
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Position of each kept row in the ledger it was filtered from.
    pub fn source_indices(&self) -> &[usize] {
        &self.source_indices
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }
}

/// Keeps the rows dated inside `range`, both ends inclusive.
///
/// Without both bounds, or without a Date column, every row is kept. Rows
/// whose date cannot be read are dropped. Filtering a result again with
/// the same range returns the same rows.
pub fn filter_by_date(ledger: &Ledger, range: &DateRange) -> FilteredLedger {
    let date_col = ColumnRoles::classify(ledger.columns()).date;
    let (Some(date_col), Some((start, end))) = (date_col, day_window(range)) else {
        return FilteredLedger {
            ledger: ledger.clone(),
            source_indices: (0..ledger.len()).collect(),
        };
    };

    let (source_indices, rows): (Vec<usize>, Vec<_>) = ledger
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            parse_date_tolerant(row.cell(date_col))
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .is_some_and(|midday| midday >= start && midday <= end)
        })
        .map(|(i, row)| (i, row.clone()))
        .unzip();

    debug!(kept = rows.len(), total = ledger.len(), %range, "filtered ledger by date");

    FilteredLedger {
        ledger: Ledger::from_shared(ledger.shared_columns(), rows),
        source_indices,
    }
}

/// Start of the first day to the last millisecond of the last day.
fn day_window(range: &DateRange) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let (from, to) = range.bounds()?;
    Some((from.and_time(NaiveTime::MIN), to.and_hms_milli_opt(23, 59, 59, 999)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgerlens_core::Transaction;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Ledger {
        Ledger::new(
            ["Date", "Narration", "Balance"],
            vec![
                Transaction::new(["01-01-2024", "Opening", "1000.00"]),
                Transaction::new(["05-01-2024", "Payment", "800.00"]),
                Transaction::new(["not a date", "Note", ""]),
                Transaction::new(["10 Jan 2024", "Salary", "1300.00"]),
                Transaction::new(["2024-02-01", "Fee", "1290.00"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn keeps_rows_inside_inclusive_window() {
        let range = DateRange::new(date(2024, 1, 5), date(2024, 1, 10));
        let filtered = filter_by_date(&sample(), &range);
        assert_eq!(filtered.source_indices(), &[1, 3]);
    }

    #[test]
    fn missing_bound_returns_everything() {
        let ledger = sample();
        let range = DateRange {
            from: Some(date(2024, 1, 5)),
            to: None,
        };
        let filtered = filter_by_date(&ledger, &range);
        assert_eq!(filtered.len(), ledger.len());
    }

    #[test]
    fn no_date_column_returns_everything() {
        let ledger = Ledger::new(["Narration"], vec![Transaction::new(["a"])]).unwrap();
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 2));
        assert_eq!(filter_by_date(&ledger, &range).len(), 1);
    }

    #[test]
    fn unparseable_dates_are_excluded() {
        let range = DateRange::new(date(1900, 1, 1), date(2100, 1, 1));
        let filtered = filter_by_date(&sample(), &range);
        assert_eq!(filtered.source_indices(), &[0, 1, 3, 4]);
    }

    #[test]
    fn rows_are_shared_not_copied() {
        let ledger = sample();
        let range = DateRange::new(date(2024, 1, 5), date(2024, 1, 5));
        let filtered = filter_by_date(&ledger, &range);
        assert!(Arc::ptr_eq(&filtered.ledger().rows()[0], &ledger.rows()[1]));
    }

    #[test]
    fn filtering_is_idempotent() {
        let range = DateRange::new(date(2024, 1, 3), date(2024, 1, 31));
        let once = filter_by_date(&sample(), &range);
        let twice = filter_by_date(once.ledger(), &range);
        assert_eq!(once.ledger(), twice.ledger());
        assert_eq!(twice.source_indices(), &[0, 1]);
    }

    #[test]
    fn source_is_untouched() {
        let ledger = sample();
        let before = ledger.clone();
        let _ = filter_by_date(&ledger, &DateRange::new(date(2024, 2, 1), date(2024, 2, 1)));
        assert_eq!(ledger, before);
    }
}
