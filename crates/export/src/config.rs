use ledgerlens_core::DateRange;
use serde::{Deserialize, Serialize};

/// Settings for a voucher export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// The bank's ledger name exactly as it appears in the accounting system.
    pub ledger_name: String,
    pub range: DateRange,
    /// Output file stem. Blank means "use the ledger name".
    pub file_name: String,
}

impl ExportConfig {
    pub fn new(ledger_name: impl Into<String>, range: DateRange) -> Self {
        ExportConfig {
            ledger_name: ledger_name.into(),
            range,
            file_name: String::new(),
        }
    }

    pub fn voucher_file_name(&self) -> String {
        let stem = if self.file_name.trim().is_empty() {
            self.ledger_name.trim()
        } else {
            self.file_name.trim()
        };
        format!("{stem}.xml")
    }
}
