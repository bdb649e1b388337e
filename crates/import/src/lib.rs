pub mod amount;
pub mod balance;
pub mod columns;
pub mod date;
pub mod engine;
pub mod extracted;
pub mod filter;
pub mod order;

pub use amount::{parse_amount, parse_balance, parse_tagged_amount, DrCr, TaggedAmount};
pub use balance::{infer_balances, infer_balances_with, BalanceInference, InferenceMethod};
pub use columns::{cell_flow, display_cell, is_low_priority, role_of, CellFlow, ColumnRole, ColumnRoles};
pub use date::{month_from_name, parse_date, parse_date_tolerant};
pub use engine::{recompute, Recomputed};
pub use extracted::{ledger_from_csv, ledger_from_json, ExtractedLedger, ImportError};
pub use filter::{filter_by_date, FilteredLedger};
pub use order::{detect_order, LedgerOrder};
