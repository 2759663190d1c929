use connectors::{http::error::HttpError, registry::RegistryError, sink::SinkError};
use thiserror::Error;

/// Run-level failures. Everything here aborts the whole run; per-dataset
/// failures never surface as errors, they become Problem results.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to read {what} file {path}: {source}")]
    FileRead {
        what: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {what} file {path}: {source}")]
    FileParse {
        what: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("schema override registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("retention sweep request failed: {0}")]
    Retention(HttpError),

    #[error("result sink failed: {0}")]
    Sink(#[from] SinkError),
}
