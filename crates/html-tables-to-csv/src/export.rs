use std::io;
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::ExtractError;
use crate::model::NormalizedTable;

fn writer_builder(delimiter: u8) -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .terminator(Terminator::Any(b'\n'));
    builder
}

fn write_records<W: io::Write>(
    writer: &mut csv::Writer<W>,
    table: &NormalizedTable,
) -> Result<(), ExtractError> {
    writer.write_record(&table.header)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `table` to `path`, replacing any existing file.
pub(crate) fn write_csv(
    path: &Path,
    table: &NormalizedTable,
    delimiter: u8,
) -> Result<(), ExtractError> {
    let mut writer = writer_builder(delimiter).from_path(path)?;
    write_records(&mut writer, table)
}

pub(crate) fn write_csv_to_bytes(
    table: &NormalizedTable,
    delimiter: u8,
) -> Result<Vec<u8>, ExtractError> {
    let mut writer = writer_builder(delimiter).from_writer(Vec::<u8>::new());
    write_records(&mut writer, table)?;
    writer
        .into_inner()
        .map_err(|error| ExtractError::Io(error.into_error()))
}

/// HTML rendering of `table` for previews: header then rows, no index
/// column, cell text escaped.
#[must_use]
pub fn render_preview(table: &NormalizedTable, classes: &str) -> String {
    let mut html = format!(
        "<table class=\"{}\">\n",
        encode_double_quoted_attribute(classes)
    );
    html.push_str("  <thead>\n    <tr>\n");
    for name in &table.header {
        html.push_str(&format!("      <th>{}</th>\n", encode_text(name)));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");
    for row in &table.rows {
        html.push_str("    <tr>\n");
        for cell in row {
            html.push_str(&format!("      <td>{}</td>\n", encode_text(cell)));
        }
        html.push_str("    </tr>\n");
    }
    html.push_str("  </tbody>\n</table>");
    html
}
