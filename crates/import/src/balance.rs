use ledgerlens_core::{BalanceSnapshot, Ledger, Money};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::amount::{parse_amount, parse_balance, parse_tagged_amount, DrCr};
use crate::columns::ColumnRoles;
use crate::order::{detect_order, LedgerOrder};

/// Which fallback produced the opening balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InferenceMethod {
    WithdrawalDeposit,
    DebitCredit,
    Amount,
    BalanceDifference,
}

impl fmt::Display for InferenceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceMethod::WithdrawalDeposit => write!(f, "withdrawal/deposit"),
            InferenceMethod::DebitCredit => write!(f, "debit/credit"),
            InferenceMethod::Amount => write!(f, "amount"),
            InferenceMethod::BalanceDifference => write!(f, "balance difference"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceInference {
    pub order: LedgerOrder,
    pub method: InferenceMethod,
    pub snapshot: BalanceSnapshot,
}

/// Reconstructs the opening and closing balance of a statement.
///
/// The closing balance is the newest row's running balance. The opening
/// balance is the oldest row's running balance with that row's own
/// movement undone, using the first column layout that is present:
///
/// 1. separate Withdrawal and Deposit columns;
/// 2. separate Debit and Credit columns;
/// 3. one Amount column, signed by an embedded `(Dr)`/`(Cr)` tag or a
///    Dr/Cr column;
/// 4. otherwise the running balance of the row stored just before the
///    oldest one (after it, for a reverse ledger).
///
/// Returns `None` without a Date and a Balance column, or when no row has
/// a readable date.
pub fn infer_balances(ledger: &Ledger) -> Option<BalanceInference> {
    infer_balances_with(ledger, &ColumnRoles::classify(ledger.columns()))
}

pub fn infer_balances_with(ledger: &Ledger, roles: &ColumnRoles) -> Option<BalanceInference> {
    let Some(balance_col) = roles.balance else {
        debug!("no balance column; skipping balance inference");
        return None;
    };
    let Some(order) = detect_order(ledger, roles) else {
        debug!("no dated rows; skipping balance inference");
        return None;
    };

    let oldest = ledger.row(order.oldest_index)?;
    let newest = ledger.row(order.newest_index)?;
    let oldest_balance = parse_balance(oldest.cell(balance_col));
    let closing = parse_amount(newest.cell(balance_col));

    // Sums past the Decimal range are treated like unreadable numbers.
    let undo = |outflow: Money, inflow: Money| {
        if outflow.is_zero() && inflow.is_zero() {
            return oldest_balance;
        }
        oldest_balance
            .checked_add(outflow)
            .and_then(|b| b.checked_sub(inflow))
            .unwrap_or_else(|| {
                debug!(%oldest_balance, %outflow, %inflow, "opening balance overflows; keeping oldest balance");
                oldest_balance
            })
    };

    let (method, opening) = if let (Some(w), Some(d)) = (roles.withdrawal, roles.deposit) {
        let opening = undo(parse_amount(oldest.cell(w)), parse_amount(oldest.cell(d)));
        (InferenceMethod::WithdrawalDeposit, opening)
    } else if let (Some(dr), Some(cr)) = (roles.debit, roles.credit) {
        let opening = undo(parse_amount(oldest.cell(dr)), parse_amount(oldest.cell(cr)));
        (InferenceMethod::DebitCredit, opening)
    } else if let Some(amount_col) = roles.amount {
        let parsed = parse_tagged_amount(oldest.cell(amount_col));
        let tag = parsed.tag.or_else(|| {
            roles.dr_cr.map(|col| {
                // Anything that is not a Dr marker counts as a credit.
                DrCr::from_marker(oldest.cell(col)).unwrap_or(DrCr::Cr)
            })
        });
        let opening = match tag {
            _ if parsed.amount.is_zero() => oldest_balance,
            Some(DrCr::Dr) => undo(parsed.amount, Money::zero()),
            Some(DrCr::Cr) => undo(Money::zero(), parsed.amount),
            None => oldest_balance,
        };
        (InferenceMethod::Amount, opening)
    } else {
        let neighbour = if order.is_chronological {
            order.oldest_index.checked_sub(1)
        } else {
            Some(order.oldest_index + 1).filter(|&i| i < ledger.len())
        };
        let opening = neighbour
            .and_then(|i| ledger.row(i))
            .map(|row| parse_amount(row.cell(balance_col)))
            .filter(|b| !b.is_zero())
            .unwrap_or(oldest_balance);
        (InferenceMethod::BalanceDifference, opening)
    };

    debug!(%method, %opening, %closing, "inferred statement balances");

    Some(BalanceInference {
        order,
        method,
        snapshot: BalanceSnapshot { opening, closing },
    })
}
