use std::path::PathBuf;
use thiserror::Error;

use crate::report::ImportReport;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("Failed to read {}: {source}", .path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed input document: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("Cannot connect to database: {0}")]
    Connection(#[source] storage::StorageError),

    #[error("Schema reset failed: {0}")]
    Schema(#[source] storage::StorageError),

    #[error(
        "Failed to load table(s) {}; committed: [{}]",
        .0.failed_tables().join(", "),
        .0.committed_tables().join(", ")
    )]
    Load(Box<ImportReport>),
}

impl ImporterError {
    /// Tables whose load transaction was rolled back, if this is a load failure.
    pub fn failed_tables(&self) -> Vec<&'static str> {
        match self {
            ImporterError::Load(report) => report.failed_tables(),
            _ => Vec::new(),
        }
    }
}
