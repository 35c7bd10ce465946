use std::collections::HashSet;

use tracing::info;

use crate::heading::positional_name;
use crate::warning::{ExtractWarning, WarningCode};

pub const RESERVED_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Drops filesystem-reserved characters and turns spaces into underscores.
#[must_use]
pub fn clean_filename(name: &str) -> String {
    name.chars()
        .filter(|ch| !RESERVED_CHARS.contains(ch))
        .map(|ch| if ch == ' ' { '_' } else { ch })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedName {
    /// Shown to users next to the preview.
    pub display: String,
    /// Used inside the persisted file name.
    pub stem: String,
}

/// Hands out table names that are unique within one extraction run.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derive(
        &mut self,
        heading: Option<&str>,
        ordinal: usize,
        warnings: &mut Vec<ExtractWarning>,
    ) -> DerivedName {
        let cleaned = heading.map(clean_filename).filter(|name| !name.is_empty());
        let mut display = if let Some(name) = cleaned {
            name
        } else {
            info!(table = ordinal, "no usable heading; using positional name");
            warnings.push(
                ExtractWarning::new(
                    WarningCode::PositionalName,
                    "no heading found before the table; using its position",
                )
                .with_table(ordinal),
            );
            positional_name(ordinal)
        };
        let mut stem = clean_filename(&display);

        if self.used.contains(&stem) {
            let taken = stem.clone();
            while self.used.contains(&stem) {
                display = format!("{display}_{ordinal}");
                stem = clean_filename(&display);
            }
            info!(table = ordinal, name = %taken, renamed = %stem, "table name already used");
            warnings.push(
                ExtractWarning::new(
                    WarningCode::NameCollision,
                    format!("name '{taken}' is already used; renamed to '{stem}'"),
                )
                .with_table(ordinal),
            );
        }

        self.used.insert(stem.clone());
        DerivedName { display, stem }
    }
}
