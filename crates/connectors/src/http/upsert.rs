use crate::http::error::HttpError;
use async_trait::async_trait;
use model::{pagination::PageRequest, records::Record};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

/// Read/delete access to one of the reporting datasets. The retention sweep
/// works against this seam; the live implementation is `UpsertClient`.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn fetch_rows(&self, request: &PageRequest) -> Result<Vec<Record>, HttpError>;
    async fn upsert_deletes(&self, dataset_id: &str, rows: &[DeleteRow]) -> Result<(), HttpError>;
}

/// Authenticated client for the portal's write API: publishes statistic
/// rows and delete-upserts to the reporting datasets, and pages through
/// them for the retention sweep.
pub struct UpsertClient {
    client: Client,
    domain: String,
    app_token: Option<String>,
    username: String,
    password: String,
}

impl UpsertClient {
    pub fn new(
        client: Client,
        domain: &str,
        app_token: Option<String>,
        username: &str,
        password: &str,
    ) -> Self {
        UpsertClient {
            client,
            domain: domain.trim_end_matches('/').to_string(),
            app_token,
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn resource_root(&self) -> String {
        format!("{}/resource", self.domain)
    }

    /// Upserts a batch of rows into one reporting dataset. Row identity is
    /// the dataset's row id column, so re-running a day replaces that day's
    /// rows instead of duplicating them.
    pub async fn upsert<T: Serialize + Sync>(
        &self,
        dataset_id: &str,
        rows: &[T],
    ) -> Result<(), HttpError> {
        let url = format!("{}/{}.json", self.resource_root(), dataset_id);
        debug!("Upserting {} rows to {url}", rows.len());

        let mut request = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(rows);
        if let Some(token) = &self.app_token {
            request = request.header("X-App-Token", token);
        }

        let response = request.send().await.map_err(|source| HttpError::Request {
            url: url.clone(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(HttpError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ReportStore for UpsertClient {
    /// Fetches one page of a reporting dataset, for the retention sweep.
    /// Same paging convention as inspection fetches.
    async fn fetch_rows(&self, request: &PageRequest) -> Result<Vec<Record>, HttpError> {
        let url = request.url(&self.resource_root());
        debug!("GET {url}");

        let mut http_request = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password));
        if let Some(token) = &self.app_token {
            http_request = http_request.header("X-App-Token", token);
        }

        let response = http_request
            .send()
            .await
            .map_err(|source| HttpError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(HttpError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(|source| HttpError::Decode {
            url: url.clone(),
            source,
        })
    }

    async fn upsert_deletes(&self, dataset_id: &str, rows: &[DeleteRow]) -> Result<(), HttpError> {
        self.upsert(dataset_id, rows).await
    }
}

/// Delete-upsert payload entry understood by the write API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeleteRow {
    #[serde(rename = ":row_id")]
    pub row_id: String,
    #[serde(rename = ":deleted")]
    pub deleted: bool,
}

impl DeleteRow {
    pub fn new(row_id: &str) -> Self {
        DeleteRow {
            row_id: row_id.to_string(),
            deleted: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_row_serializes_to_api_shape() {
        let json = serde_json::to_value(DeleteRow::new("abcd-1234.2018-06-01")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ ":row_id": "abcd-1234.2018-06-01", ":deleted": true })
        );
    }
}
