use ledgerlens_core::Ledger;
use ledgerlens_import::{parse_date_tolerant, ColumnRoles};
use std::fmt;

use crate::config::ExportConfig;

/// A problem with the export form. Shown to the user as-is; the ledger is
/// never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    MissingLedgerName,
    MissingFromDate,
    MissingToDate,
    FromBeforeFirstTransaction,
    FromAfterTo,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Advisory::MissingLedgerName => "Please enter a Bank Name (As per tally)",
            Advisory::MissingFromDate => "Please select a From Date",
            Advisory::MissingToDate => "Please select an End Date",
            Advisory::FromBeforeFirstTransaction => {
                "From Date cannot be earlier than the first transaction date"
            }
            Advisory::FromAfterTo => "From Date cannot be greater than End Date",
        };
        f.write_str(message)
    }
}

/// Checks a voucher export request. Returns every problem found, most
/// basic first; an empty list means the export can go ahead.
pub fn validate_export(ledger: &Ledger, config: &ExportConfig) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if config.ledger_name.trim().is_empty() {
        advisories.push(Advisory::MissingLedgerName);
    }
    let range = config.range;
    if range.from.is_none() {
        advisories.push(Advisory::MissingFromDate);
    }
    if range.to.is_none() {
        advisories.push(Advisory::MissingToDate);
    }

    // The first stored row, not the oldest one.
    let first_date = ColumnRoles::classify(ledger.columns())
        .date
        .zip(ledger.row(0))
        .and_then(|(col, row)| parse_date_tolerant(row.cell(col)));
    if let (Some(from), Some(first)) = (range.from, first_date) {
        if from < first {
            advisories.push(Advisory::FromBeforeFirstTransaction);
        }
    }
    if range.is_inverted() {
        advisories.push(Advisory::FromAfterTo);
    }

    advisories
}
