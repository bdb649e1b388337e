use ledgerlens_core::{BalanceSnapshot, DateRange, Ledger};

use crate::balance::{infer_balances_with, BalanceInference};
use crate::columns::ColumnRoles;
use crate::filter::{filter_by_date, FilteredLedger};

/// Everything derived from the current ledger and date window.
#[derive(Debug, Clone, PartialEq)]
pub struct Recomputed {
    /// The input ledger with inferred balances attached, when there are any.
    pub ledger: Ledger,
    pub roles: ColumnRoles,
    pub inference: Option<BalanceInference>,
    pub filtered: FilteredLedger,
}

impl Recomputed {
    /// Inferred balances, or zeros when they could not be inferred.
    pub fn snapshot(&self) -> BalanceSnapshot {
        self.inference.map(|i| i.snapshot).unwrap_or_default()
    }
}

/// Recomputes derived state from scratch. Call it whenever the ledger or
/// the range changes; nothing is cached between calls and `ledger` is left
/// as it was.
pub fn recompute(ledger: &Ledger, range: &DateRange) -> Recomputed {
    let roles = ColumnRoles::classify(ledger.columns());
    let inference = infer_balances_with(ledger, &roles);
    let annotated = match inference {
        Some(inf) => ledger.with_balance(inf.snapshot),
        None => ledger.clone(),
    };
    let filtered = filter_by_date(ledger, range);
    Recomputed {
        ledger: annotated,
        roles,
        inference,
        filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgerlens_core::{Money, Transaction};

    fn sample() -> Ledger {
        Ledger::new(
            ["Date", "Narration", "Withdrawal", "Deposit", "Balance"],
            vec![
                Transaction::new(["01-01-2024", "Opening", "", "", "1000.00"]),
                Transaction::new(["05-01-2024", "Payment", "200.00", "", "800.00"]),
                Transaction::new(["10-01-2024", "Salary", "", "500.00", "1300.00"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn attaches_balances_and_filters() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        let out = recompute(&sample(), &range);
        assert_eq!(out.ledger.balance(), Some(&out.snapshot()));
        assert_eq!(out.filtered.len(), 2);
        assert_eq!(out.roles.withdrawal, Some(2));
    }

    #[test]
    fn edits_are_picked_up_on_next_recompute() {
        let ledger = sample();
        let first = recompute(&ledger, &DateRange::unbounded());
        let edited = ledger.delete_row(2).unwrap();
        let second = recompute(&edited, &DateRange::unbounded());

        assert_eq!(first.snapshot().closing.to_string(), "1300.00");
        assert_eq!(second.snapshot().closing.to_string(), "800.00");
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn missing_roles_default_to_zero() {
        let ledger = Ledger::new(["Narration"], vec![Transaction::new(["x"])]).unwrap();
        let out = recompute(&ledger, &DateRange::unbounded());
        assert!(out.inference.is_none());
        assert!(out.ledger.balance().is_none());
        assert_eq!(out.snapshot().opening, Money::zero());
    }
}
