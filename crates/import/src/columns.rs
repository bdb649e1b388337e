use serde::{Deserialize, Serialize};
use std::fmt;

use crate::amount::{parse_amount, DrCr};

/// Semantic meaning of a statement column, read from its header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    Date,
    ValueDate,
    Balance,
    Withdrawal,
    Deposit,
    Debit,
    Credit,
    DrCr,
    Amount,
    Other,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Date => "Date",
            ColumnRole::ValueDate => "Value Date",
            ColumnRole::Balance => "Balance",
            ColumnRole::Withdrawal => "Withdrawal",
            ColumnRole::Deposit => "Deposit",
            ColumnRole::Debit => "Debit",
            ColumnRole::Credit => "Credit",
            ColumnRole::DrCr => "Dr/Cr",
            ColumnRole::Amount => "Amount",
            ColumnRole::Other => "Other",
        };
        f.write_str(name)
    }
}

impl ColumnRole {
    /// Every role with a header rule, in the order [`role_of`] tries them.
    pub const MATCHABLE: [ColumnRole; 9] = [
        ColumnRole::Date,
        ColumnRole::ValueDate,
        ColumnRole::Balance,
        ColumnRole::Withdrawal,
        ColumnRole::Deposit,
        ColumnRole::Debit,
        ColumnRole::Credit,
        ColumnRole::DrCr,
        ColumnRole::Amount,
    ];

    /// Case-insensitive header rule for this role.
    pub fn matches(self, header: &str) -> bool {
        let h = header.to_lowercase();
        match self {
            ColumnRole::Date => h.contains("date") && !h.contains("value"),
            ColumnRole::ValueDate => h.contains("date") && h.contains("value"),
            ColumnRole::Balance => h.contains("balance"),
            ColumnRole::Withdrawal => h.contains("withdrawal"),
            ColumnRole::Deposit => h.contains("deposit"),
            ColumnRole::Debit => h.contains("debit") && !h.contains("card"),
            ColumnRole::Credit => h.contains("credit") && !h.contains("card"),
            ColumnRole::DrCr => h.contains("dr/cr") || h.contains("dr / cr"),
            ColumnRole::Amount => h.contains("amount"),
            ColumnRole::Other => false,
        }
    }
}

/// The single most specific role for one header, for display.
pub fn role_of(header: &str) -> ColumnRole {
    ColumnRole::MATCHABLE
        .into_iter()
        .find(|role| role.matches(header))
        .unwrap_or(ColumnRole::Other)
}

/// Column index for each role. Roles are resolved independently, so one
/// column may fill several (`"Debit Amount"` is both Debit and Amount).
/// When several columns match a role the leftmost wins.
///
/// Derived from headers on demand; never stored on a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub date: Option<usize>,
    pub value_date: Option<usize>,
    pub balance: Option<usize>,
    pub withdrawal: Option<usize>,
    pub deposit: Option<usize>,
    pub debit: Option<usize>,
    pub credit: Option<usize>,
    pub dr_cr: Option<usize>,
    pub amount: Option<usize>,
}

impl ColumnRoles {
    pub fn classify<S: AsRef<str>>(headers: &[S]) -> Self {
        let find = |role: ColumnRole| headers.iter().position(|h| role.matches(h.as_ref()));
        ColumnRoles {
            date: find(ColumnRole::Date),
            value_date: find(ColumnRole::ValueDate),
            balance: find(ColumnRole::Balance),
            withdrawal: find(ColumnRole::Withdrawal),
            deposit: find(ColumnRole::Deposit),
            debit: find(ColumnRole::Debit),
            credit: find(ColumnRole::Credit),
            dr_cr: find(ColumnRole::DrCr),
            amount: find(ColumnRole::Amount),
        }
    }

    pub fn index_of(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::Date => self.date,
            ColumnRole::ValueDate => self.value_date,
            ColumnRole::Balance => self.balance,
            ColumnRole::Withdrawal => self.withdrawal,
            ColumnRole::Deposit => self.deposit,
            ColumnRole::Debit => self.debit,
            ColumnRole::Credit => self.credit,
            ColumnRole::DrCr => self.dr_cr,
            ColumnRole::Amount => self.amount,
            ColumnRole::Other => None,
        }
    }
}

const LOW_PRIORITY_KEYWORDS: [&str; 6] =
    ["balance", "remarks", "reference", "ref", "cheque", "instrument"];

/// Columns a narrow display may hide first.
pub fn is_low_priority(header: &str) -> bool {
    let h = header.to_lowercase();
    LOW_PRIORITY_KEYWORDS.iter().any(|k| h.contains(k))
}

/// Cell text for display: trimmed, with blanks shown as `-`.
pub fn display_cell(cell: &str) -> &str {
    match cell.trim() {
        "" | "null" | "undefined" => "-",
        trimmed => trimmed,
    }
}

/// Direction of money in a single cell, for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellFlow {
    Outflow,
    Inflow,
}

/// Whether `cell`, under `header`, shows money leaving or entering the
/// account. `row` is the whole row the cell belongs to, needed to spot a
/// separate Dr/Cr marker next to an amount.
pub fn cell_flow<S: AsRef<str>>(header: &str, cell: &str, row: &[S]) -> Option<CellFlow> {
    let h = header.to_lowercase();
    let positive = || {
        let c = cell.trim();
        !c.is_empty() && c != "-" && parse_amount(c).is_positive()
    };
    let plain_number = || {
        let c = cell.trim();
        !c.is_empty() && c.chars().all(|ch| ch.is_ascii_digit() || ",.-".contains(ch))
    };
    let marker = |tag: DrCr| row.iter().any(|c| DrCr::from_marker(c.as_ref()) == Some(tag));

    if h.contains("withdrawal") && positive() {
        Some(CellFlow::Outflow)
    } else if h.contains("deposit") && positive() {
        Some(CellFlow::Inflow)
    } else if h.contains("amount") && marker(DrCr::Dr) {
        Some(CellFlow::Outflow)
    } else if h.contains("amount") && marker(DrCr::Cr) {
        Some(CellFlow::Inflow)
    } else if h.contains("debit") && plain_number() && positive() {
        Some(CellFlow::Outflow)
    } else if h.contains("credit") && plain_number() && positive() {
        Some(CellFlow::Inflow)
    } else {
        None
    }
}
