use async_trait::async_trait;
use model::{
    pagination::{PageOutcome, PageRequest},
    records::Record,
};
use reqwest::Client;
use tracing::debug;

/// Response header carrying the dataset's field names. Suppressed by the
/// API for datasets with very many columns.
pub const SCHEMA_HINT_HEADER: &str = "X-SODA2-Fields";

/// One fetched page plus the transport metadata the schema resolver needs
/// on the first page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub outcome: PageOutcome,
    pub schema_hint: Option<String>,
    pub url: String,
}

/// Issues one paged request. Implementations decide the page's shape once;
/// callers never see raw responses. Swapped for a scripted source in tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, request: &PageRequest) -> FetchedPage;
}

/// Live implementation against the portal's paging API. Transport and
/// decode failures are folded into `PageOutcome::TransportError`; the
/// caller decides disposition. No retries here.
pub struct HttpPageSource {
    client: Client,
    root_url: String,
}

impl HttpPageSource {
    pub fn new(client: Client, root_url: &str) -> Self {
        HttpPageSource {
            client,
            root_url: root_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root_url(&self) -> &str {
        &self.root_url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, request: &PageRequest) -> FetchedPage {
        let url = request.url(&self.root_url);
        debug!("GET {url}");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                let reason = format!("Failed to reach a server. Reason: {err}");
                return FetchedPage {
                    outcome: PageOutcome::TransportError(reason),
                    schema_hint: None,
                    url,
                };
            }
        };

        let schema_hint = response
            .headers()
            .get(SCHEMA_HINT_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        if !response.status().is_success() {
            let reason = format!(
                "The server couldn't fulfill the request. Error Code: {}",
                response.status().as_u16()
            );
            return FetchedPage {
                outcome: PageOutcome::TransportError(reason),
                schema_hint,
                url,
            };
        }

        let records: Vec<Record> = match response.json().await {
            Ok(records) => records,
            Err(err) => {
                let reason = format!("Failed to decode response body. Reason: {err}");
                return FetchedPage {
                    outcome: PageOutcome::TransportError(reason),
                    schema_hint,
                    url,
                };
            }
        };

        let outcome = if records.is_empty() {
            PageOutcome::Empty
        } else {
            PageOutcome::Records(records)
        };

        FetchedPage {
            outcome,
            schema_hint,
            url,
        }
    }
}
