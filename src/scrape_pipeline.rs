use html_tables_to_csv::{ExtractOptions, ExtractionReport, MemorySink, extract_document};
use regex::Regex;

use crate::cache;
use crate::error::ApiError;
use crate::page_source;

/// Fetches `raw_url`, extracts its tables and stores every CSV in the cache.
pub async fn scrape_and_store(raw_url: &str, ttl_seconds: u32) -> Result<ExtractionReport, ApiError> {
    let document = page_source::fetch_document(raw_url).await?;
    let mut sink = MemorySink::new();
    let report = extract_document(&document, &ExtractOptions::default(), &mut sink)?;

    for file in sink.files() {
        cache::store_table(&file.filename, &file.contents, ttl_seconds).await?;
    }

    worker::console_log!(
        "table extraction completed: url={}, located={}, saved={}, warnings={}",
        document.url,
        report.table_count,
        report.results.len(),
        report.warnings.len()
    );

    Ok(report)
}

/// Accepts only plain `.csv` names without path separators. Dots inside
/// the name are fine; table headings and page names keep them.
pub fn validate_download_name(filename: &str) -> Result<&str, ApiError> {
    let name_re =
        Regex::new(r"^[^/\\]+\.csv$").map_err(|error| ApiError::Internal(error.to_string()))?;
    if !name_re.is_match(filename) {
        return Err(ApiError::BadRequest(format!(
            "invalid file name: {filename}"
        )));
    }
    Ok(filename)
}
