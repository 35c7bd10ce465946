use crate::locate::{TableElement, text_content};

/// Trimmed text of the heading recorded for `table`, if any.
pub fn resolve_heading(table: &TableElement<'_>) -> Option<String> {
    table.heading.map(text_content)
}

#[must_use]
pub fn positional_name(ordinal: usize) -> String {
    format!("Table {ordinal}")
}
