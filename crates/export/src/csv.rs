use csv::{QuoteStyle, Terminator, WriterBuilder};
use ledgerlens_core::Ledger;

use crate::sanitize::clean_cell;
use crate::{ExportBlob, ExportError, CSV_MIME};

/// Renders a ledger as CSV: header row first, every field quoted, rows
/// separated by `\n` with no trailing newline. Cells are cleaned with
/// [`clean_cell`]; headers are written as they are.
pub fn encode_csv(ledger: &Ledger) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(ledger.columns())?;
    for row in ledger.rows() {
        writer.write_record(row.cells().iter().map(|c| clean_cell(c)))?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    let mut content = String::from_utf8(bytes)?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}

/// [`encode_csv`] wrapped as a downloadable `<stem>.csv` blob.
pub fn export_csv(ledger: &Ledger, stem: &str) -> Result<ExportBlob, ExportError> {
    Ok(ExportBlob {
        file_name: format!("{}.csv", stem.trim()),
        mime: CSV_MIME,
        content: encode_csv(ledger)?,
    })
}
