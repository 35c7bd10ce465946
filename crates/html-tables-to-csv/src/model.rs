use crate::warning::ExtractWarning;

/// Header cells plus the body rows that matched the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.header.len()
    }
}

/// One retained table of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub ordinal: usize,
    pub name: String,
    pub filename: String,
    pub location: String,
    pub html_preview: String,
    pub column_count: usize,
    pub row_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub page_name: String,
    /// Number of table elements located, including skipped ones.
    pub table_count: usize,
    pub results: Vec<ExtractionResult>,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionReport {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.results.iter().map(|result| result.row_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTable {
    pub filename: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}
