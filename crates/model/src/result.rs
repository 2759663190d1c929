use crate::{
    catalog::DatasetDescriptor, schema::FieldSchema, stats, tally::NullCounters,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatasetStatus {
    Clean,
    WithNulls,
    Problem,
}

impl fmt::Display for DatasetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DatasetStatus::Clean => "Clean",
            DatasetStatus::WithNulls => "WithNulls",
            DatasetStatus::Problem => "Problem",
        };
        f.write_str(s)
    }
}

/// Diagnostic attached to a Problem result: why the dataset could not be
/// processed and the URL being worked when it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub message: String,
    pub resource: String,
}

/// Terminal artifact for one dataset, immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetResult {
    pub descriptor: DatasetDescriptor,
    pub status: DatasetStatus,
    pub total_records: u64,
    pub total_columns: u64,
    pub total_values: u64,
    pub total_nulls: u64,
    pub percent_null: f64,
    /// Per-field null counts in schema order. Empty for Problem results.
    pub field_counts: Vec<(String, u64)>,
    pub problem: Option<Problem>,
}

impl DatasetResult {
    /// Builds the result for a dataset whose pagination loop completed.
    pub fn completed(
        descriptor: DatasetDescriptor,
        schema: &FieldSchema,
        counters: &NullCounters,
        total_records: u64,
    ) -> Self {
        let total_columns = schema.len() as u64;
        let total_values = stats::total_values(total_records, total_columns);
        let total_nulls = stats::total_nulls(counters);
        let status = if total_nulls > 0 {
            DatasetStatus::WithNulls
        } else {
            DatasetStatus::Clean
        };

        DatasetResult {
            descriptor,
            status,
            total_records,
            total_columns,
            total_values,
            total_nulls,
            percent_null: stats::percent_null(total_nulls, total_values),
            field_counts: counters.ordered(schema),
            problem: None,
        }
    }

    pub fn problem(descriptor: DatasetDescriptor, message: String, resource: String) -> Self {
        DatasetResult {
            descriptor,
            status: DatasetStatus::Problem,
            total_records: 0,
            total_columns: 0,
            total_values: 0,
            total_nulls: 0,
            percent_null: 0.0,
            field_counts: Vec::new(),
            problem: Some(Problem { message, resource }),
        }
    }

    pub fn is_problem(&self) -> bool {
        self.status == DatasetStatus::Problem
    }
}
