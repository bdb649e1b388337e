pub mod ledger;
pub mod money;
pub mod period;
pub mod transaction;

pub use chrono::NaiveDate as CalendarDate;
pub use ledger::{BalanceSnapshot, Ledger, LedgerError};
pub use money::Money;
pub use period::DateRange;
pub use transaction::Transaction;
