use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("No tables found on {url}")]
    NoTablesFound { url: String },

    #[error("error processing table {ordinal}: {source}")]
    TableProcessing {
        ordinal: usize,
        #[source]
        source: Box<ExtractError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl ExtractError {
    /// True when the run never got past retrieving the document.
    #[must_use]
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::Fetch { .. })
    }

    pub(crate) fn in_table(self, ordinal: usize) -> Self {
        match self {
            Self::TableProcessing { .. } => self,
            other => Self::TableProcessing {
                ordinal,
                source: Box::new(other),
            },
        }
    }
}
