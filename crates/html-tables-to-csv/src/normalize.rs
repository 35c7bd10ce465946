use tracing::warn;

use crate::locate::{TableElement, owned_descendants, text_content};
use crate::model::NormalizedTable;
use crate::warning::{ExtractWarning, WarningCode};

const HEADER_CELLS: &[&str] = &["th", "td"];
const DATA_CELLS: &[&str] = &["td"];

/// Builds the rectangular form of `table`.
///
/// The first row supplies the header from both `th` and `td` cells. Later
/// rows contribute only their `td` cells and are kept only when their width
/// equals the header width; anything else is dropped with a warning, never
/// padded or truncated.
pub(crate) fn normalize_table(
    table: &TableElement<'_>,
    warnings: &mut Vec<ExtractWarning>,
) -> NormalizedTable {
    let mut rows = owned_descendants(table.element, &["tr"], "table");

    let header = rows
        .next()
        .map(|row| {
            owned_descendants(row, HEADER_CELLS, "tr")
                .map(text_content)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let body = rows
        .map(|row| {
            owned_descendants(row, DATA_CELLS, "tr")
                .map(text_content)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    NormalizedTable {
        rows: retain_matching_rows(header.len(), body, table.ordinal, warnings),
        header,
    }
}

pub(crate) fn retain_matching_rows(
    width: usize,
    body: Vec<Vec<String>>,
    ordinal: usize,
    warnings: &mut Vec<ExtractWarning>,
) -> Vec<Vec<String>> {
    let mut kept = Vec::with_capacity(body.len());

    // Row 1 is the header row.
    for (row_number, cells) in (2..).zip(body) {
        if cells.is_empty() {
            warn!(table = ordinal, row = row_number, "dropping row without data cells");
            warnings.push(
                ExtractWarning::new(WarningCode::EmptyRow, "row has no data cells; dropped")
                    .with_table(ordinal)
                    .with_row(row_number),
            );
            continue;
        }

        if cells.len() != width {
            warn!(
                table = ordinal,
                row = row_number,
                cells = cells.len(),
                header = width,
                "dropping row with mismatched width"
            );
            warnings.push(
                ExtractWarning::new(
                    WarningCode::RowWidthMismatch,
                    format!(
                        "row has {} cells but the header has {width}; dropped",
                        cells.len()
                    ),
                )
                .with_table(ordinal)
                .with_row(row_number),
            );
            continue;
        }

        kept.push(cells);
    }

    kept
}
