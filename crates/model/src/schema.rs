use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema hint contained no field names: {0:?}")]
    EmptyHint(String),

    #[error("override document contained no visible fields")]
    EmptyOverride,
}

/// Ordered, de-duplicated field names for one dataset. Resolved once per
/// dataset and immutable for the life of its pagination loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    fields: Vec<String>,
}

impl FieldSchema {
    pub fn new(fields: Vec<String>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let fields = fields
            .into_iter()
            .filter(|f| seen.insert(f.clone()))
            .collect();
        FieldSchema { fields }
    }

    /// Parses a header-style hint into field names. The hint is a raw header
    /// value such as `[":id", "county", "crash_date"]`; tokens are runs of
    /// letters, digits and underscores.
    pub fn from_hint(hint: &str) -> Result<Self, SchemaError> {
        let mut fields = Vec::new();
        let mut current = String::new();
        for c in hint.chars() {
            if c.is_ascii_alphanumeric() || c == '_' {
                current.push(c);
            } else if !current.is_empty() {
                fields.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            fields.push(current);
        }
        if fields.is_empty() {
            return Err(SchemaError::EmptyHint(hint.to_string()));
        }
        Ok(FieldSchema::new(fields))
    }

    /// Builds a schema from a pre-captured override document, keeping only
    /// the visible columns.
    pub fn from_override(doc: &OverrideDocument) -> Result<Self, SchemaError> {
        let fields = doc.visible_fields();
        if fields.is_empty() {
            return Err(SchemaError::EmptyOverride);
        }
        Ok(FieldSchema::new(fields))
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Captured metadata document for a dataset too wide for the API to
/// advertise its schema inline. Mirrors the portal's view-metadata export:
/// columns carrying `flags` are hidden, the rest are visible.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideDocument {
    pub meta: OverrideMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverrideMeta {
    pub view: OverrideView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverrideView {
    pub columns: Vec<OverrideColumn>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverrideColumn {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(default)]
    pub flags: Option<Vec<String>>,
}

impl OverrideDocument {
    pub fn visible_fields(&self) -> Vec<String> {
        self.meta
            .view
            .columns
            .iter()
            .filter(|c| c.flags.is_none())
            .map(|c| c.field_name.clone())
            .collect()
    }

    pub fn hidden_fields(&self) -> Vec<String> {
        self.meta
            .view
            .columns
            .iter()
            .filter(|c| c.flags.is_some())
            .map(|c| c.field_name.clone())
            .collect()
    }
}
