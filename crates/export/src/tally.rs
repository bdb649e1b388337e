//! Voucher XML for the Tally accounting system.
//!
//! Rows are read by position, not by header: the upstream extractor
//! normalises statements to a six-column layout with the date first, the
//! narration fourth and withdrawal/deposit fifth and sixth. Nothing here
//! checks that a ledger actually has that layout.

use ledgerlens_core::Ledger;
use ledgerlens_import::{filter_by_date, parse_date_tolerant};
use std::fmt;
use tracing::debug;

use crate::config::ExportConfig;
use crate::sanitize::{clean_narration, escape_xml};
use crate::validate::validate_export;
use crate::{ExportBlob, ExportError, XML_MIME};

pub const DATE_INDEX: usize = 0;
pub const NARRATION_INDEX: usize = 3;
pub const WITHDRAWAL_INDEX: usize = 4;
pub const DEPOSIT_INDEX: usize = 5;

/// Counter ledger every voucher posts against.
pub const SUSPENSE_LEDGER: &str = "Suspense";

const ENVELOPE_OPEN: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<ENVELOPE>
<HEADER>
<TALLYREQUEST>Import Data</TALLYREQUEST>
</HEADER>
<BODY>
<IMPORTDATA>
<REQUESTDESC>
<REPORTNAME>Vouchers</REPORTNAME>
</REQUESTDESC>
<REQUESTDATA>
";

const ENVELOPE_CLOSE: &str = "</REQUESTDATA>
</IMPORTDATA>
</BODY>
</ENVELOPE>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoucherType {
    Payment,
    Receipt,
}

impl fmt::Display for VoucherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoucherType::Payment => write!(f, "Payment"),
            VoucherType::Receipt => write!(f, "Receipt"),
        }
    }
}

/// One voucher, with every field already in output form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voucher {
    pub voucher_type: VoucherType,
    /// `YYYYMMDD`, or empty when the date cell could not be read.
    pub date: String,
    pub narration: String,
    /// Unsigned amount, digits, `.` and `-` only.
    pub amount: String,
}

impl Voucher {
    pub fn from_cells(date: &str, narration: &str, withdrawal: &str, deposit: &str) -> Self {
        let (withdrawal, deposit) = (withdrawal.trim(), deposit.trim());
        let voucher_type = if withdrawal.is_empty() {
            VoucherType::Receipt
        } else {
            VoucherType::Payment
        };
        let raw_amount = [withdrawal, deposit]
            .into_iter()
            .find(|s| !s.is_empty())
            .unwrap_or("0");
        Voucher {
            voucher_type,
            date: voucher_date(date),
            narration: clean_narration(narration),
            amount: raw_amount
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect(),
        }
    }

    /// Appends this voucher's `<TALLYMESSAGE>` block.
    ///
    /// A payment debits Suspense and credits the bank; a receipt the
    /// reverse.
    pub fn render(&self, bank_ledger: &str, out: &mut String) {
        let bank = escape_xml(bank_ledger);
        let (suspense_positive, suspense_amount, bank_positive) = match self.voucher_type {
            VoucherType::Payment => ("Yes", format!("-{}", self.amount), "No"),
            VoucherType::Receipt => ("No", self.amount.clone(), "Yes"),
        };
        out.push_str(&format!(
            "<TALLYMESSAGE xmlns:UDF=\"TallyUDF\">
<VOUCHER VCHTYPE=\"{vtype}\" ACTION=\"Create\">
<DATE>{date}</DATE>
<VOUCHERTYPENAME>{vtype}</VOUCHERTYPENAME>
<NARRATION>{narration}</NARRATION>
<PARTYLEDGERNAME>{bank}</PARTYLEDGERNAME>
<ALLLEDGERENTRIES.LIST>
<LEDGERNAME>{SUSPENSE_LEDGER}</LEDGERNAME>
<ISDEEMEDPOSITIVE>{suspense_positive}</ISDEEMEDPOSITIVE>
<AMOUNT>{suspense_amount}</AMOUNT>
</ALLLEDGERENTRIES.LIST>
<ALLLEDGERENTRIES.LIST>
<LEDGERNAME>{bank}</LEDGERNAME>
<ISDEEMEDPOSITIVE>{bank_positive}</ISDEEMEDPOSITIVE>
<AMOUNT>{amount}</AMOUNT>
</ALLLEDGERENTRIES.LIST>
</VOUCHER>
</TALLYMESSAGE>
",
            vtype = self.voucher_type,
            date = self.date,
            narration = self.narration,
            amount = self.amount,
        ));
    }
}

/// A statement date as `YYYYMMDD`; empty when unreadable.
pub fn voucher_date(cell: &str) -> String {
    parse_date_tolerant(cell)
        .map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_default()
}

/// Renders every row of `ledger` as a voucher inside the import envelope.
/// No validation or filtering happens here.
pub fn encode_vouchers(ledger: &Ledger, bank_ledger: &str) -> String {
    let mut out = String::from(ENVELOPE_OPEN);
    for row in ledger.rows() {
        Voucher::from_cells(
            row.cell(DATE_INDEX),
            row.cell(NARRATION_INDEX),
            row.cell(WITHDRAWAL_INDEX),
            row.cell(DEPOSIT_INDEX),
        )
        .render(bank_ledger, &mut out);
    }
    out.push_str(ENVELOPE_CLOSE);
    out
}

/// Validates the request, filters the ledger to the requested range and
/// renders the vouchers. The first advisory blocks the export.
pub fn export_tally(ledger: &Ledger, config: &ExportConfig) -> Result<ExportBlob, ExportError> {
    if let Some(&advisory) = validate_export(ledger, config).first() {
        return Err(ExportError::Blocked(advisory));
    }
    let filtered = filter_by_date(ledger, &config.range);
    debug!(vouchers = filtered.len(), ledger = %config.ledger_name, "rendering vouchers");
    Ok(ExportBlob {
        file_name: config.voucher_file_name(),
        mime: XML_MIME,
        content: encode_vouchers(filtered.ledger(), config.ledger_name.trim()),
    })
}
