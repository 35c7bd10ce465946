use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::ExtractError;

pub const DEFAULT_PREVIEW_CLASSES: &str = "table table-striped";

/// Heading tags (`h1`..`h6`) that may name a following table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingLevels {
    levels: BTreeSet<u8>,
}

impl HeadingLevels {
    #[must_use]
    pub fn contains_tag(&self, tag: &str) -> bool {
        let bytes = tag.as_bytes();
        if bytes.len() != 2 || !bytes[0].eq_ignore_ascii_case(&b'h') {
            return false;
        }
        let level = bytes[1].wrapping_sub(b'0');
        self.levels.contains(&level)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.levels.iter().copied()
    }
}

impl Default for HeadingLevels {
    fn default() -> Self {
        Self {
            levels: BTreeSet::from([2, 3]),
        }
    }
}

impl FromStr for HeadingLevels {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut levels = BTreeSet::new();
        for token in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let digits = token
                .strip_prefix('h')
                .or_else(|| token.strip_prefix('H'))
                .unwrap_or(token);
            let level: u8 = digits
                .parse()
                .map_err(|_| format!("invalid heading level: '{token}'"))?;
            if !(1..=6).contains(&level) {
                return Err(format!("heading level out of range (1-6): '{token}'"));
            }
            levels.insert(level);
        }

        if levels.is_empty() {
            return Err("heading levels cannot be empty".to_string());
        }

        Ok(Self { levels })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub heading_levels: HeadingLevels,
    pub delimiter: u8,
    pub preview_classes: String,
}

impl ExtractOptions {
    pub(crate) fn validate(&self) -> Result<(), ExtractError> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(ExtractError::InvalidOption(format!(
                "unsupported delimiter {:?}",
                char::from(self.delimiter)
            )));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            heading_levels: HeadingLevels::default(),
            delimiter: b',',
            preview_classes: DEFAULT_PREVIEW_CLASSES.to_string(),
        }
    }
}
