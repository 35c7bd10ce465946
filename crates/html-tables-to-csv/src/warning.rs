#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCode {
    RowWidthMismatch,
    EmptyRow,
    EmptyTable,
    NameCollision,
    PositionalName,
}

impl WarningCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RowWidthMismatch => "row_width_mismatch",
            Self::EmptyRow => "empty_row",
            Self::EmptyTable => "empty_table",
            Self::NameCollision => "name_collision",
            Self::PositionalName => "positional_name",
        }
    }
}

/// A condition that was tolerated during extraction.
///
/// `table` is the 1-based document ordinal of the table, `row` the 1-based
/// position of the row inside that table (the header row is row 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractWarning {
    pub code: WarningCode,
    pub message: String,
    pub table: Option<usize>,
    pub row: Option<usize>,
}

impl ExtractWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            table: None,
            row: None,
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: usize) -> Self {
        self.table = Some(table);
        self
    }

    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}
