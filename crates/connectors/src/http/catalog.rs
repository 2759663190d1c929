use crate::http::error::HttpError;
use model::{catalog::DatasetDescriptor, records::Record};
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

/// Reads the catalog from the portal's freshness-report dataset. A failure
/// here is process-fatal: without a catalog there is nothing to inspect.
pub struct CatalogClient {
    client: Client,
    root_url: String,
    catalog_api_id: String,
    page_limit: usize,
}

impl CatalogClient {
    pub fn new(client: Client, root_url: &str, catalog_api_id: &str, page_limit: usize) -> Self {
        CatalogClient {
            client,
            root_url: root_url.trim_end_matches('/').to_string(),
            catalog_api_id: catalog_api_id.to_string(),
            page_limit,
        }
    }

    pub async fn fetch_catalog(&self) -> Result<Vec<DatasetDescriptor>, HttpError> {
        let url = format!(
            "{}/{}.json?$limit={}",
            self.root_url, self.catalog_api_id, self.page_limit
        );
        info!("Fetching catalog from {url}");

        let response = self
            .client
            .get(&url)
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

        let records: Vec<Record> =
            response
                .json()
                .await
                .map_err(|source| HttpError::Decode {
                    url: url.clone(),
                    source,
                })?;

        let mut descriptors = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match descriptor_from_record(record, index) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(err) => {
                    // A single malformed catalog row is skipped, not fatal.
                    warn!("Skipping catalog record: {err}");
                }
            }
        }

        info!("Catalog lists {} datasets", descriptors.len());
        Ok(descriptors)
    }
}

fn descriptor_from_record(record: &Record, index: usize) -> Result<DatasetDescriptor, HttpError> {
    let name = record
        .get("dataset_name")
        .and_then(Value::as_str)
        .ok_or(HttpError::MalformedCatalogRecord {
            index,
            field: "dataset_name",
        })?;

    // The link is an object with a `url` key in current exports; older
    // exports carried a bare string.
    let link = record
        .get("link")
        .ok_or(HttpError::MalformedCatalogRecord {
            index,
            field: "link",
        })?;
    let link_url = match link {
        Value::String(s) => s.as_str(),
        Value::Object(obj) => {
            obj.get("url")
                .and_then(Value::as_str)
                .ok_or(HttpError::MalformedCatalogRecord {
                    index,
                    field: "link.url",
                })?
        }
        _ => {
            return Err(HttpError::MalformedCatalogRecord {
                index,
                field: "link",
            });
        }
    };
    let api_id = link_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(link_url);

    let provider = record
        .get("data_provided_by")
        .and_then(Value::as_str)
        .unwrap_or("");

    Ok(DatasetDescriptor::new(name, api_id, provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_from_object_link() {
        let record: Record = serde_json::from_str(
            r#"{
                "dataset_name": "Toll Rates",
                "link": { "url": "https://opendata.example.gov/d/abcd-1234" },
                "data_provided_by": "MDTA"
            }"#,
        )
        .unwrap();

        let desc = descriptor_from_record(&record, 0).unwrap();
        assert_eq!(desc.api_id, "abcd-1234");
        assert_eq!(desc.name, "Toll Rates");
        assert_eq!(desc.provider, "MDTA");
    }

    #[test]
    fn descriptor_from_string_link() {
        let record: Record = serde_json::from_str(
            r#"{
                "dataset_name": "Bridges",
                "link": "https://opendata.example.gov/d/wxyz-0000"
            }"#,
        )
        .unwrap();

        let desc = descriptor_from_record(&record, 0).unwrap();
        assert_eq!(desc.api_id, "wxyz-0000");
        assert_eq!(desc.provider, "");
    }

    #[test]
    fn missing_name_is_rejected() {
        let record: Record =
            serde_json::from_str(r#"{ "link": "https://x/d/a-1" }"#).unwrap();
        assert!(descriptor_from_record(&record, 3).is_err());
    }
}
