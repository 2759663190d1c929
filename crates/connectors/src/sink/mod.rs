pub mod csv;
pub mod remote;

use crate::http::error::HttpError;
use async_trait::async_trait;
use model::report::{FieldRow, OverviewRow, ProblemRow};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("remote error: {0}")]
    Remote(#[from] HttpError),

    #[error("sink writer lock poisoned")]
    Poisoned,
}

/// Recorder of dataset statistics at overview and per-field granularity.
/// The engine writes to any number of these without knowing whether rows
/// land in a remote dataset or a local file.
#[async_trait]
pub trait StatsSink: Send + Sync {
    async fn record_overview(&self, row: &OverviewRow) -> Result<(), SinkError>;
    async fn record_fields(&self, rows: &[FieldRow]) -> Result<(), SinkError>;
}

/// Recorder of datasets that could not be processed.
#[async_trait]
pub trait ProblemSink: Send + Sync {
    async fn report(&self, row: &ProblemRow) -> Result<(), SinkError>;
}
