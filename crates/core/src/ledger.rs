use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use super::money::Money;
use super::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Row {row} has {found} cells, expected {expected}")]
    CellCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row index {index} is out of range (ledger has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },
}

/// Opening and closing balance inferred for a whole statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub opening: Money,
    pub closing: Money,
}

/// An immutable snapshot of one statement: headers plus rows.
///
/// Every edit returns a new `Ledger`. Rows are reference counted, so rows
/// an edit does not touch are shared with the previous snapshot and any
/// filtered view taken from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    columns: Arc<[String]>,
    rows: Vec<Arc<Transaction>>,
    balance: Option<BalanceSnapshot>,
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::from_shared(Arc::from(Vec::new()), Vec::new())
    }
}

impl Ledger {
    /// Builds a ledger, rejecting any row whose width differs from the
    /// header count.
    pub fn new<C, S>(columns: C, rows: Vec<Transaction>) -> Result<Self, LedgerError>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Arc<[String]> = columns.into_iter().map(Into::into).collect();
        let expected = columns.len();
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != expected)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(LedgerError::CellCountMismatch { row, expected, found });
        }
        Ok(Ledger {
            columns,
            rows: rows.into_iter().map(Arc::new).collect(),
            balance: None,
        })
    }

    /// Builds a ledger from extraction output, where table detection
    /// sometimes yields rows with a cell too many or too few. Short rows
    /// are padded with empty cells and long rows truncated.
    pub fn from_extracted<C, S>(columns: C, rows: Vec<Vec<String>>) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Arc<[String]> = columns.into_iter().map(Into::into).collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| {
                if cells.len() != width {
                    warn!(row = i, found = cells.len(), expected = width, "fitting ragged row");
                }
                Arc::new(Transaction::from(cells).fit_to(width))
            })
            .collect();
        Ledger::from_shared(columns, rows)
    }

    /// Builds a ledger from rows that already share an owner, e.g. a
    /// subset of another ledger's rows. Row identity is preserved.
    pub fn from_shared(columns: Arc<[String]>, rows: Vec<Arc<Transaction>>) -> Self {
        Ledger {
            columns,
            rows,
            balance: None,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn shared_columns(&self) -> Arc<[String]> {
        Arc::clone(&self.columns)
    }

    pub fn rows(&self) -> &[Arc<Transaction>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Transaction> {
        self.rows.get(index).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Inferred balances attached by [`Ledger::with_balance`]. Cleared by
    /// every row edit.
    pub fn balance(&self) -> Option<&BalanceSnapshot> {
        self.balance.as_ref()
    }

    pub fn with_balance(&self, snapshot: BalanceSnapshot) -> Self {
        Ledger {
            balance: Some(snapshot),
            ..self.clone()
        }
    }

    /// An all-empty row of the right width, the starting point for an add.
    pub fn blank_row(&self) -> Transaction {
        Transaction::blank(self.width())
    }

    pub fn insert_above(&self, index: usize, row: Transaction) -> Result<Self, LedgerError> {
        self.check_index(index)?;
        self.insert_at(index, row)
    }

    pub fn insert_below(&self, index: usize, row: Transaction) -> Result<Self, LedgerError> {
        self.check_index(index)?;
        self.insert_at(index + 1, row)
    }

    pub fn push_row(&self, row: Transaction) -> Result<Self, LedgerError> {
        self.insert_at(self.rows.len(), row)
    }

    pub fn update_row(&self, index: usize, row: Transaction) -> Result<Self, LedgerError> {
        self.check_index(index)?;
        self.check_width(index, &row)?;
        let mut rows = self.rows.clone();
        rows[index] = Arc::new(row);
        Ok(self.derive(rows))
    }

    pub fn delete_row(&self, index: usize) -> Result<Self, LedgerError> {
        self.check_index(index)?;
        let mut rows = self.rows.clone();
        rows.remove(index);
        Ok(self.derive(rows))
    }

    /// Rows on a 0-based page. Pages past the end are empty.
    pub fn page(&self, page: usize, page_size: usize) -> &[Arc<Transaction>] {
        if page_size == 0 {
            return &[];
        }
        let start = page.saturating_mul(page_size).min(self.rows.len());
        let end = start.saturating_add(page_size).min(self.rows.len());
        &self.rows[start..end]
    }

    pub fn total_pages(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.rows.len().div_ceil(page_size)
    }

    fn insert_at(&self, position: usize, row: Transaction) -> Result<Self, LedgerError> {
        self.check_width(position, &row)?;
        let mut rows = self.rows.clone();
        rows.insert(position, Arc::new(row));
        Ok(self.derive(rows))
    }

    fn derive(&self, rows: Vec<Arc<Transaction>>) -> Self {
        Ledger::from_shared(self.shared_columns(), rows)
    }

    fn check_index(&self, index: usize) -> Result<(), LedgerError> {
        if index >= self.rows.len() {
            return Err(LedgerError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        Ok(())
    }

    fn check_width(&self, row_index: usize, row: &Transaction) -> Result<(), LedgerError> {
        if row.len() != self.width() {
            return Err(LedgerError::CellCountMismatch {
                row: row_index,
                expected: self.width(),
                found: row.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ledger {
        Ledger::new(
            ["Date", "Narration", "Balance"],
            vec![
                Transaction::new(["01-01-2024", "Opening", "1000.00"]),
                Transaction::new(["05-01-2024", "Payment", "800.00"]),
                Transaction::new(["10-01-2024", "Salary", "1300.00"]),
            ],
        )
        .unwrap()
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn new_rejects_ragged_rows() {
        let err = Ledger::new(
            ["Date", "Balance"],
            vec![
                Transaction::new(["01-01-2024", "1"]),
                Transaction::new(["02-01-2024"]),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            LedgerError::CellCountMismatch {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn from_extracted_fits_ragged_rows() {
        let ledger = Ledger::from_extracted(
            ["Date", "Narration", "Balance"],
            vec![
                vec!["01-01-2024".into(), "a".into()],
                vec!["02-01-2024".into(), "b".into(), "10".into(), "extra".into()],
            ],
        );
        assert_eq!(ledger.row(0).unwrap().cells(), ["01-01-2024", "a", ""]);
        assert_eq!(ledger.row(1).unwrap().cells(), ["02-01-2024", "b", "10"]);
    }

    // ── row edits ─────────────────────────────────────────────────────────────

    #[test]
    fn insert_above_and_below() {
        let ledger = sample();
        let row = Transaction::new(["03-01-2024", "Fee", "990.00"]);

        let above = ledger.insert_above(1, row.clone()).unwrap();
        assert_eq!(above.row(1).unwrap().cell(1), "Fee");
        assert_eq!(above.len(), 4);

        let below = ledger.insert_below(1, row).unwrap();
        assert_eq!(below.row(2).unwrap().cell(1), "Fee");
        assert_eq!(below.row(1).unwrap().cell(1), "Payment");
    }

    #[test]
    fn push_row_appends_at_the_end() {
        let ledger = sample();
        let added = ledger.push_row(ledger.blank_row()).unwrap();
        assert_eq!(added.len(), 4);
        assert_eq!(added.row(3).unwrap().cells(), ["", "", ""]);
        assert!(Arc::ptr_eq(&ledger.rows()[2], &added.rows()[2]));
        assert!(matches!(
            ledger.push_row(Transaction::new(["x"])),
            Err(LedgerError::CellCountMismatch { row: 3, expected: 3, found: 1 })
        ));
    }

    #[test]
    fn edits_leave_previous_snapshot_untouched() {
        let ledger = sample();
        let edited = ledger
            .update_row(1, Transaction::new(["05-01-2024", "Refund", "900.00"]))
            .unwrap();
        let deleted = ledger.delete_row(0).unwrap();

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.row(1).unwrap().cell(1), "Payment");
        assert_eq!(edited.row(1).unwrap().cell(1), "Refund");
        assert_eq!(deleted.len(), 2);
        assert_eq!(deleted.row(0).unwrap().cell(1), "Payment");
    }

    #[test]
    fn untouched_rows_keep_identity() {
        let ledger = sample();
        let deleted = ledger.delete_row(0).unwrap();
        assert!(Arc::ptr_eq(&ledger.rows()[1], &deleted.rows()[0]));
    }

    #[test]
    fn edits_reject_bad_index_and_width() {
        let ledger = sample();
        assert!(matches!(
            ledger.delete_row(3),
            Err(LedgerError::RowOutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(
            ledger.update_row(0, Transaction::new(["x"])),
            Err(LedgerError::CellCountMismatch { .. })
        ));
        assert_eq!(ledger.blank_row().len(), 3);
    }

    #[test]
    fn edits_clear_attached_balance() {
        let ledger = sample().with_balance(BalanceSnapshot::default());
        assert!(ledger.balance().is_some());
        assert!(ledger.delete_row(0).unwrap().balance().is_none());
    }

    // ── pagination ────────────────────────────────────────────────────────────

    #[test]
    fn pages() {
        let ledger = sample();
        assert_eq!(ledger.total_pages(2), 2);
        assert_eq!(ledger.page(0, 2).len(), 2);
        assert_eq!(ledger.page(1, 2).len(), 1);
        assert!(ledger.page(5, 2).is_empty());
        assert_eq!(ledger.total_pages(0), 0);
        assert!(ledger.page(0, 0).is_empty());
    }
}
