use connectors::registry::OverrideRegistry;
use model::schema::FieldSchema;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Why a dataset's schema could not be determined. Terminal for that
/// dataset; never retried.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Too many fields. Schema hint suppressed in response and no override configured.")]
    HintSuppressed,

    #[error("Schema hint could not be parsed: {0}")]
    BadHint(#[from] model::schema::SchemaError),
}

/// Determines a dataset's field schema from the first page's transport
/// metadata, falling back to the override registry for datasets whose
/// column count is too large for the API to advertise inline.
pub struct SchemaResolver {
    registry: Arc<dyn OverrideRegistry>,
}

impl SchemaResolver {
    pub fn new(registry: Arc<dyn OverrideRegistry>) -> Self {
        SchemaResolver { registry }
    }

    /// Resolution order: header hint, then override registry, then fail.
    /// Called exactly once per dataset, with the first page's hint.
    pub fn resolve(
        &self,
        api_id: &str,
        hint: Option<&str>,
    ) -> Result<FieldSchema, ResolveError> {
        if let Some(hint) = hint {
            let schema = FieldSchema::from_hint(hint)?;
            debug!("Resolved {} fields for {api_id} from header hint", schema.len());
            return Ok(schema);
        }

        match self.registry.lookup(api_id) {
            Some(schema) => {
                debug!(
                    "Resolved {} fields for {api_id} from override registry",
                    schema.len()
                );
                Ok(schema.clone())
            }
            None => Err(ResolveError::HintSuppressed),
        }
    }
}
