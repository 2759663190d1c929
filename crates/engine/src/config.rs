use crate::error::EngineError;
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

fn default_page_limit() -> usize {
    10_000
}

fn default_page_delay_ms() -> u64 {
    200
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

/// Run configuration, deserialized from a JSON file. An unreadable config
/// or credentials file aborts the run: that is a broken deployment, not a
/// bad dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Portal domain, e.g. `https://opendata.maryland.gov`.
    pub domain: String,

    /// Api id of the freshness-report dataset that enumerates the catalog.
    pub catalog_api_id: String,

    /// Page size; also the threshold at which `$offset` starts being sent.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// Pause between consecutive full pages of one dataset.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Name prefixes of datasets known to be non-tabular exports; matched
    /// datasets are skipped without any fetch.
    #[serde(default)]
    pub skip_name_prefixes: Vec<String>,

    /// Pre-captured schema files for datasets too wide for the API to
    /// advertise a schema hint, keyed by api id.
    #[serde(default)]
    pub schema_overrides: HashMap<String, PathBuf>,

    pub credentials_file: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path).map_err(|source| EngineError::FileRead {
            what: "config",
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| EngineError::FileParse {
            what: "config",
            path: path.display().to_string(),
            source,
        })
    }

    /// Read root for dataset resources.
    pub fn resource_root(&self) -> String {
        format!("{}/resource", self.domain.trim_end_matches('/'))
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub access: AccessCredentials,
    #[serde(default)]
    pub app_token: Option<String>,
    pub overview_dataset: ReportingTarget,
    pub field_dataset: ReportingTarget,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessCredentials {
    pub username: String,
    pub password: String,
}

/// One reporting dataset on the portal's write side.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingTarget {
    pub app_id: String,
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path).map_err(|source| EngineError::FileRead {
            what: "credentials",
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| EngineError::FileParse {
            what: "credentials",
            path: path.display().to_string(),
            source,
        })
    }
}
