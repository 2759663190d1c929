use connectors::{http::error::HttpError, sink::SinkError};
use engine::error::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Catalog request failed: {0}")]
    Catalog(HttpError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),

    #[error("Invalid --before date {0:?}, expected YYYY-MM-DD")]
    InvalidCutoffDate(String),
}
