use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server rejected {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("catalog record at index {index} is missing {field}")]
    MalformedCatalogRecord { index: usize, field: &'static str },
}
