mod document;
mod error;
mod export;
mod fetch;
mod heading;
mod locate;
mod model;
mod normalize;
mod options;
mod sanitize;
mod sink;
mod warning;

use scraper::Html;
use tracing::{debug, info, warn};

use crate::heading::resolve_heading;
use crate::locate::{TableElement, locate_tables};
use crate::normalize::normalize_table;
use crate::sanitize::NameRegistry;
use crate::warning::WarningCode;

pub use document::{Document, FALLBACK_PAGE_NAME, decode_html, page_name, parse_url};
pub use error::ExtractError;
pub use export::render_preview;
pub use fetch::Fetcher;
#[cfg(feature = "fetch")]
pub use fetch::{DEFAULT_TIMEOUT, HttpFetcher};
pub use model::{
    ExtractionReport, ExtractionResult, FetchedPage, NormalizedTable, PersistedTable,
};
pub use options::{DEFAULT_PREVIEW_CLASSES, ExtractOptions, HeadingLevels};
pub use sanitize::{RESERVED_CHARS, clean_filename};
pub use sink::{DirectorySink, MemorySink, TableSink};
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

/// Either every retained table of the page, or the reason the run stopped.
pub type ExtractionOutcome = Result<ExtractionReport, ExtractError>;

/// Fetches `url` and extracts its tables into `sink`.
///
/// Nothing is written when the fetch fails.
pub fn extract_url<F, S>(
    url: &str,
    fetcher: &F,
    options: &ExtractOptions,
    sink: &mut S,
) -> ExtractionOutcome
where
    F: Fetcher + ?Sized,
    S: TableSink + ?Sized,
{
    options.validate()?;
    let url = parse_url(url)?;

    debug!(%url, "fetching");
    let page = fetcher.fetch(&url)?;
    let document = Document::from_bytes(url, &page.body, page.content_type.as_deref());
    extract_document(&document, options, sink)
}

/// Extracts every table of an already fetched `document` into `sink`.
///
/// Rows whose width differs from their header are dropped and tables left
/// without rows are skipped; both only produce warnings. Any other failure
/// while handling a table aborts the whole run.
pub fn extract_document<S>(
    document: &Document,
    options: &ExtractOptions,
    sink: &mut S,
) -> ExtractionOutcome
where
    S: TableSink + ?Sized,
{
    options.validate()?;

    debug!(url = %document.url, "locating tables");
    let html = Html::parse_document(&document.html);
    let tables = locate_tables(&html, &document.url, &options.heading_levels)?;
    let page_name = document.page_name();

    let mut names = NameRegistry::new();
    let mut warnings = Vec::new();
    let mut results = Vec::new();

    for table in &tables {
        debug!(table = table.ordinal, "processing table");
        let result = process_table(table, &page_name, options, &mut names, sink, &mut warnings)
            .map_err(|error| {
                tracing::error!(table = table.ordinal, %error, "error processing table");
                error.in_table(table.ordinal)
            })?;
        results.extend(result);
    }

    info!(
        url = %document.url,
        located = tables.len(),
        saved = results.len(),
        warnings = warnings.len(),
        "extraction finished"
    );

    Ok(ExtractionReport {
        page_name,
        table_count: tables.len(),
        results,
        warnings,
    })
}

fn process_table<S>(
    table: &TableElement<'_>,
    page_name: &str,
    options: &ExtractOptions,
    names: &mut NameRegistry,
    sink: &mut S,
    warnings: &mut Vec<ExtractWarning>,
) -> Result<Option<ExtractionResult>, ExtractError>
where
    S: TableSink + ?Sized,
{
    let heading = resolve_heading(table);
    let normalized = normalize_table(table, warnings);

    if normalized.is_empty() {
        warn!(table = table.ordinal, "skipping table: no data rows");
        warnings.push(
            ExtractWarning::new(WarningCode::EmptyTable, "table has no data rows; skipped")
                .with_table(table.ordinal),
        );
        return Ok(None);
    }

    let name = names.derive(heading.as_deref(), table.ordinal, warnings);
    let filename = format!("{page_name}_{}.csv", name.stem);
    let location = sink.write_table(&filename, &normalized, options.delimiter)?;
    info!(
        table = table.ordinal,
        name = %name.display,
        rows = normalized.rows.len(),
        "saved table to {filename}"
    );

    Ok(Some(ExtractionResult {
        ordinal: table.ordinal,
        html_preview: render_preview(&normalized, &options.preview_classes),
        column_count: normalized.width(),
        row_count: normalized.rows.len(),
        name: name.display,
        filename,
        location,
    }))
}
