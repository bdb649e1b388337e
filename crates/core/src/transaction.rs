use serde::{Deserialize, Serialize};

/// One statement row: string cells positionally aligned to the ledger's
/// columns. Rows are never edited in place; an edit replaces the row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(Vec<String>);

impl Transaction {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Transaction(cells.into_iter().map(Into::into).collect())
    }

    /// A row of `width` empty cells.
    pub fn blank(width: usize) -> Self {
        Transaction(vec![String::new(); width])
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    /// The cell at `index`, or `""` when the row is shorter than that.
    pub fn cell(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pads with empty cells or truncates so the row has exactly `width`
    /// cells.
    pub fn fit_to(mut self, width: usize) -> Self {
        self.0.resize(width, String::new());
        self
    }
}

impl From<Vec<String>> for Transaction {
    fn from(cells: Vec<String>) -> Self {
        Transaction(cells)
    }
}
