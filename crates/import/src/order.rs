use chrono::NaiveDate;
use ledgerlens_core::Ledger;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::amount::parse_amount;
use crate::columns::ColumnRoles;
use crate::date::parse_date_tolerant;

/// Where the oldest and newest transactions sit in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerOrder {
    pub oldest_index: usize,
    pub newest_index: usize,
    pub oldest_date: NaiveDate,
    pub newest_date: NaiveDate,
    /// The oldest row is stored before the newest one.
    pub is_chronological: bool,
}

/// Finds the oldest and newest rows of a ledger.
///
/// Rows whose date cell cannot be read are skipped. Several rows can share
/// the oldest (or newest) date; statements carry no time of day, so the
/// running balance decides which of them is the first or last posting:
///
/// - chronological ledger: the oldest-day row with the highest balance and
///   the newest-day row with the lowest balance;
/// - reverse ledger: the opposite.
///
/// Returns `None` when there is no Date column or no row has a readable
/// date.
pub fn detect_order(ledger: &Ledger, roles: &ColumnRoles) -> Option<LedgerOrder> {
    let date_col = roles.date?;
    let dated: Vec<(usize, NaiveDate)> = ledger
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(i, row)| parse_date_tolerant(row.cell(date_col)).map(|d| (i, d)))
        .collect();

    let &(first_index, first_date) = dated.first()?;
    let (mut oldest_index, mut oldest_date) = (first_index, first_date);
    let (mut newest_index, mut newest_date) = (first_index, first_date);

    // Provisional picks; on equal dates the later row wins.
    for &(i, date) in &dated {
        if date <= oldest_date {
            oldest_date = date;
            oldest_index = i;
        }
        if date >= newest_date {
            newest_date = date;
            newest_index = i;
        }
    }

    let is_chronological = oldest_index < newest_index;

    let balance = |i: usize| {
        roles
            .balance
            .and_then(|col| ledger.row(i).map(|r| parse_amount(r.cell(col))))
            .unwrap_or_default()
    };

    for &(i, date) in &dated {
        if date == oldest_date {
            let (current, selected) = (balance(i), balance(oldest_index));
            let better = if is_chronological {
                current > selected
            } else {
                current < selected
            };
            if better {
                oldest_index = i;
            }
        }
        if date == newest_date {
            let (current, selected) = (balance(i), balance(newest_index));
            let better = if is_chronological {
                current < selected
            } else {
                current > selected
            };
            if better {
                newest_index = i;
            }
        }
    }

    debug!(oldest_index, newest_index, is_chronological, "detected ledger order");

    Some(LedgerOrder {
        oldest_index,
        newest_index,
        oldest_date,
        newest_date,
        is_chronological,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlens_core::Transaction;

    fn ledger(rows: &[[&str; 3]]) -> Ledger {
        Ledger::new(
            ["Date", "Narration", "Balance"],
            rows.iter().map(|r| Transaction::new(*r)).collect(),
        )
        .unwrap()
    }

    fn order(l: &Ledger) -> LedgerOrder {
        detect_order(l, &ColumnRoles::classify(l.columns())).unwrap()
    }

    #[test]
    fn chronological_ledger() {
        let l = ledger(&[
            ["01-01-2024", "a", "1000"],
            ["05-01-2024", "b", "800"],
            ["10-01-2024", "c", "1300"],
        ]);
        let o = order(&l);
        assert_eq!((o.oldest_index, o.newest_index), (0, 2));
        assert!(o.is_chronological);
    }

    #[test]
    fn reverse_ledger() {
        let l = ledger(&[
            ["10-01-2024", "c", "1300"],
            ["05-01-2024", "b", "800"],
            ["01-01-2024", "a", "1000"],
        ]);
        let o = order(&l);
        assert_eq!((o.oldest_index, o.newest_index), (2, 0));
        assert!(!o.is_chronological);
    }

    #[test]
    fn unparseable_rows_are_skipped() {
        let l = ledger(&[
            ["Opening Balance", "", "900"],
            ["01-01-2024", "a", "1000"],
            ["10-01-2024", "c", "1300"],
            ["", "", ""],
        ]);
        let o = order(&l);
        assert_eq!((o.oldest_index, o.newest_index), (1, 2));
    }

    #[test]
    fn no_readable_dates() {
        let l = ledger(&[["n/a", "a", "1"]]);
        assert_eq!(detect_order(&l, &ColumnRoles::classify(l.columns())), None);
    }

    // ── same-day tie-break ────────────────────────────────────────────────────

    #[test]
    fn chronological_tie_prefers_higher_balance_for_oldest() {
        for rows in [
            [
                ["01-01-2024", "a", "800"],
                ["01-01-2024", "b", "1000"],
                ["05-01-2024", "c", "900"],
            ],
            [
                ["01-01-2024", "a", "1000"],
                ["01-01-2024", "b", "800"],
                ["05-01-2024", "c", "900"],
            ],
        ] {
            let l = ledger(&rows);
            let o = order(&l);
            assert!(o.is_chronological);
            assert_eq!(l.row(o.oldest_index).unwrap().cell(2), "1000");
        }
    }

    #[test]
    fn chronological_tie_prefers_lower_balance_for_newest() {
        let l = ledger(&[
            ["01-01-2024", "a", "1000"],
            ["05-01-2024", "b", "700"],
            ["05-01-2024", "c", "900"],
        ]);
        let o = order(&l);
        assert_eq!(o.newest_index, 1);
    }

    #[test]
    fn reverse_tie_prefers_lower_balance_for_oldest() {
        let l = ledger(&[
            ["05-01-2024", "c", "900"],
            ["01-01-2024", "b", "1000"],
            ["01-01-2024", "a", "800"],
        ]);
        let o = order(&l);
        assert!(!o.is_chronological);
        assert_eq!(o.oldest_index, 2);
    }

    #[test]
    fn reverse_tie_prefers_higher_balance_for_newest() {
        let l = ledger(&[
            ["05-01-2024", "d", "700"],
            ["05-01-2024", "c", "900"],
            ["01-01-2024", "a", "800"],
        ]);
        let o = order(&l);
        assert_eq!(o.newest_index, 1);
    }
}
