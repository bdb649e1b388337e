//! Ledgers handed over by the statement extraction service.

use ledgerlens_core::Ledger;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Statement has no columns")]
    NoColumns,
}

/// Wire shape of an extracted table. Cells may arrive as strings, numbers
/// or nulls; they are all read as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedLedger {
    pub columns: Vec<String>,
    #[serde(alias = "rows", default)]
    pub transactions: Vec<Vec<Value>>,
}

impl ExtractedLedger {
    pub fn into_ledger(self) -> Result<Ledger, ImportError> {
        if self.columns.is_empty() {
            return Err(ImportError::NoColumns);
        }
        let rows = self
            .transactions
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        Ok(Ledger::from_extracted(self.columns, rows))
    }

    pub fn from_ledger(ledger: &Ledger) -> Self {
        ExtractedLedger {
            columns: ledger.columns().to_vec(),
            transactions: ledger
                .rows()
                .iter()
                .map(|row| row.cells().iter().cloned().map(Value::String).collect())
                .collect(),
        }
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Reads the extraction service's JSON payload.
pub fn ledger_from_json<R: Read>(data: R) -> Result<Ledger, ImportError> {
    let extracted: ExtractedLedger = serde_json::from_reader(data)?;
    extracted.into_ledger()
}

/// Reads a ledger from CSV. The first record is the header row; later
/// records may be ragged.
pub fn ledger_from_csv<R: Read>(data: R) -> Result<Ledger, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let columns: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    if columns.is_empty() {
        return Err(ImportError::NoColumns);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(Ledger::from_extracted(columns, rows))
}
