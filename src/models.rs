use html_tables_to_csv::{ExtractWarning, ExtractionReport, ExtractionResult};
use serde::{Deserialize, Serialize};

pub const TABLE_CACHE_KEY_PREFIX: &str = "table:v1:";
pub const DEFAULT_TABLE_CACHE_TTL_SECONDS: u32 = 7 * 24 * 60 * 60;
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const MAX_ALERT_LOG_CHARS: usize = 3500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableView {
    pub name: String,
    pub filename: String,
    pub download_url: String,
    pub rows: usize,
    pub columns: usize,
    pub html_preview: String,
}

impl From<&ExtractionResult> for TableView {
    fn from(result: &ExtractionResult) -> Self {
        Self {
            name: result.name.clone(),
            filename: result.filename.clone(),
            download_url: download_path(&result.filename),
            rows: result.row_count,
            columns: result.column_count,
            html_preview: result.html_preview.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarningView {
    pub code: String,
    pub message: String,
    pub table: Option<usize>,
    pub row: Option<usize>,
}

impl From<&ExtractWarning> for WarningView {
    fn from(warning: &ExtractWarning) -> Self {
        Self {
            code: warning.code.as_str().to_string(),
            message: warning.message.clone(),
            table: warning.table,
            row: warning.row,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TablesResponse {
    pub page_name: String,
    pub table_count: usize,
    pub tables: Vec<TableView>,
    pub warnings: Vec<WarningView>,
}

impl From<&ExtractionReport> for TablesResponse {
    fn from(report: &ExtractionReport) -> Self {
        Self {
            page_name: report.page_name.clone(),
            table_count: report.table_count,
            tables: report.results.iter().map(TableView::from).collect(),
            warnings: report.warnings.iter().map(WarningView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TelegramMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Relative link serving a persisted table.
pub fn download_path(filename: &str) -> String {
    format!("/download/{}", urlencoding::encode(filename))
}
