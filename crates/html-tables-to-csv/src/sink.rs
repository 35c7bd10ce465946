use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ExtractError;
use crate::export::{write_csv, write_csv_to_bytes};
use crate::model::{NormalizedTable, PersistedTable};

/// Destination for exported tables.
pub trait TableSink {
    /// Persists `table` under `filename`, replacing earlier content, and
    /// returns where it ended up.
    fn write_table(
        &mut self,
        filename: &str,
        table: &NormalizedTable,
        delimiter: u8,
    ) -> Result<String, ExtractError>;
}

/// Writes CSV files into one output directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Creates `root` (and parents) if missing.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self, ExtractError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TableSink for DirectorySink {
    fn write_table(
        &mut self,
        filename: &str,
        table: &NormalizedTable,
        delimiter: u8,
    ) -> Result<String, ExtractError> {
        let path = self.root.join(filename);
        debug!(path = %path.display(), "writing csv");
        write_csv(&path, table, delimiter)?;
        Ok(path.display().to_string())
    }
}

/// Keeps CSV bytes in memory for callers with their own storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Vec<PersistedTable>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn files(&self) -> &[PersistedTable] {
        &self.files
    }

    #[must_use]
    pub fn into_files(self) -> Vec<PersistedTable> {
        self.files
    }
}

impl TableSink for MemorySink {
    fn write_table(
        &mut self,
        filename: &str,
        table: &NormalizedTable,
        delimiter: u8,
    ) -> Result<String, ExtractError> {
        let contents = write_csv_to_bytes(table, delimiter)?;
        if let Some(existing) = self.files.iter_mut().find(|file| file.filename == filename) {
            existing.contents = contents;
        } else {
            self.files.push(PersistedTable {
                filename: filename.to_string(),
                contents,
            });
        }
        Ok(filename.to_string())
    }
}
