use model::schema::{FieldSchema, OverrideDocument, SchemaError};
use std::{collections::HashMap, fs, path::Path};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read override file for {api_id} at {path}: {source}")]
    Read {
        api_id: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse override file for {api_id} at {path}: {source}")]
    Parse {
        api_id: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("override file for {api_id} is unusable: {source}")]
    Schema {
        api_id: String,
        #[source]
        source: SchemaError,
    },
}

/// Fallback source of field schemas for datasets whose schema hint the API
/// suppresses. Keyed by api id; misses are not errors, they just mean no
/// override is configured.
pub trait OverrideRegistry: Send + Sync {
    fn lookup(&self, api_id: &str) -> Option<&FieldSchema>;
}

/// Registry backed by pre-captured metadata files listed in configuration.
/// All files are loaded eagerly at startup; a missing or undecodable
/// configured file aborts the run, since it indicates a broken deployment
/// rather than a bad dataset.
#[derive(Debug, Default)]
pub struct FileOverrideRegistry {
    schemas: HashMap<String, FieldSchema>,
}

impl FileOverrideRegistry {
    pub fn load<P: AsRef<Path>>(entries: &HashMap<String, P>) -> Result<Self, RegistryError> {
        let mut schemas = HashMap::new();
        for (api_id, path) in entries {
            let path = path.as_ref();
            let contents = fs::read_to_string(path).map_err(|source| RegistryError::Read {
                api_id: api_id.clone(),
                path: path.display().to_string(),
                source,
            })?;
            let doc: OverrideDocument =
                serde_json::from_str(&contents).map_err(|source| RegistryError::Parse {
                    api_id: api_id.clone(),
                    path: path.display().to_string(),
                    source,
                })?;
            let schema =
                FieldSchema::from_override(&doc).map_err(|source| RegistryError::Schema {
                    api_id: api_id.clone(),
                    source,
                })?;
            info!(
                "Loaded schema override for {api_id}: {} visible fields",
                schema.len()
            );
            schemas.insert(api_id.clone(), schema);
        }
        Ok(FileOverrideRegistry { schemas })
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl OverrideRegistry for FileOverrideRegistry {
    fn lookup(&self, api_id: &str) -> Option<&FieldSchema> {
        self.schemas.get(api_id)
    }
}
