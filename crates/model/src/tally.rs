use crate::{records::Record, schema::FieldSchema};
use std::collections::HashMap;

/// Per-dataset accumulator of missing-field counts. Seeded from the schema
/// before the first page is tallied, never decremented, and destroyed with
/// the dataset's processing.
#[derive(Debug, Clone)]
pub struct NullCounters {
    counts: HashMap<String, u64>,
}

impl NullCounters {
    pub fn for_schema(schema: &FieldSchema) -> Self {
        let counts = schema.fields().iter().map(|f| (f.clone(), 0)).collect();
        NullCounters { counts }
    }

    /// Tallies one page of records. A field counts as null only when its key
    /// is absent from the record; a present key with an empty-string value is
    /// a value, not a null.
    pub fn tally(&mut self, records: &[Record]) {
        for record in records {
            for (field, count) in self.counts.iter_mut() {
                if !record.contains_key(field) {
                    *count += 1;
                }
            }
        }
    }

    pub fn get(&self, field: &str) -> u64 {
        self.counts.get(field).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Counts in schema order, for reporting.
    pub fn ordered(&self, schema: &FieldSchema) -> Vec<(String, u64)> {
        schema
            .fields()
            .iter()
            .map(|f| (f.clone(), self.get(f)))
            .collect()
    }
}
