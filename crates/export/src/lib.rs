pub mod config;
pub mod csv;
pub mod sanitize;
pub mod tally;
pub mod validate;

use thiserror::Error;

pub use config::ExportConfig;
pub use self::csv::{encode_csv, export_csv};
pub use tally::{encode_vouchers, export_tally, Voucher, VoucherType};
pub use validate::{validate_export, Advisory};

pub const CSV_MIME: &str = "text/csv; charset=utf-8";
pub const XML_MIME: &str = "application/xml; charset=utf-8";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("{0}")]
    Blocked(Advisory),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// A finished export, ready for the caller to save or download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    pub file_name: String,
    pub mime: &'static str,
    pub content: String,
}
