//! Rows handed to the result sinks. Serde field order matches the column
//! order of the reporting datasets, so the same row type serves both the
//! CSV writers and the remote upsert payloads.

use crate::{identifiers::stable_id, result::DatasetResult, stats};
use serde::Serialize;

/// One dataset-level statistics row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverviewRow {
    #[serde(rename = "DATASET NAME")]
    pub dataset_name: String,
    #[serde(rename = "HYPERLINK")]
    pub hyperlink: String,
    #[serde(rename = "TOTAL COLUMN COUNT")]
    pub total_column_count: u64,
    #[serde(rename = "TOTAL RECORD COUNT")]
    pub total_record_count: u64,
    #[serde(rename = "TOTAL VALUE COUNT")]
    pub total_value_count: u64,
    #[serde(rename = "TOTAL NULL VALUE COUNT")]
    pub total_null_count: u64,
    #[serde(rename = "PERCENT NULL")]
    pub percent_null: f64,
    #[serde(rename = "DATASET ID")]
    pub dataset_id: String,
    #[serde(rename = "DATA PROVIDER")]
    pub data_provider: String,
    #[serde(rename = "DATE")]
    pub date: String,
    #[serde(rename = "ROW ID")]
    pub row_id: String,
}

/// One field-level statistics row. Percent here is nulls over records, not
/// over total values.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldRow {
    #[serde(rename = "DATASET NAME")]
    pub dataset_name: String,
    #[serde(rename = "FIELD NAME")]
    pub field_name: String,
    #[serde(rename = "TOTAL NULL VALUE COUNT")]
    pub null_count: u64,
    #[serde(rename = "TOTAL RECORD COUNT")]
    pub total_record_count: u64,
    #[serde(rename = "PERCENT NULL")]
    pub percent_null: f64,
    #[serde(rename = "HYPERLINK")]
    pub hyperlink: String,
    #[serde(rename = "DATASET ID")]
    pub dataset_id: String,
    #[serde(rename = "FIELD ID")]
    pub field_id: String,
    #[serde(rename = "DATE")]
    pub date: String,
    #[serde(rename = "ROW ID")]
    pub row_id: String,
}

/// One problem-dataset row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProblemRow {
    #[serde(rename = "DATASET NAME")]
    pub dataset_name: String,
    #[serde(rename = "PROBLEM MESSAGE")]
    pub message: String,
    #[serde(rename = "RESOURCE")]
    pub resource: String,
}

/// Landing page for a dataset, used as the hyperlink column.
pub fn dataset_hyperlink(root: &str, api_id: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), api_id)
}

impl OverviewRow {
    pub fn from_result(result: &DatasetResult, root: &str, date: &str) -> Self {
        let api_id = result.descriptor.api_id.as_str();
        OverviewRow {
            dataset_name: result.descriptor.name.clone(),
            hyperlink: dataset_hyperlink(root, api_id),
            total_column_count: result.total_columns,
            total_record_count: result.total_records,
            total_value_count: result.total_values,
            total_null_count: result.total_nulls,
            percent_null: result.percent_null,
            dataset_id: api_id.to_string(),
            data_provider: result.descriptor.provider.clone(),
            date: date.to_string(),
            row_id: stable_id(&[api_id, date]),
        }
    }
}

impl FieldRow {
    pub fn rows_from_result(result: &DatasetResult, root: &str, date: &str) -> Vec<Self> {
        let api_id = result.descriptor.api_id.as_str();
        let hyperlink = dataset_hyperlink(root, api_id);
        result
            .field_counts
            .iter()
            .map(|(field, null_count)| {
                let field_id = stable_id(&[api_id, field]);
                FieldRow {
                    dataset_name: result.descriptor.name.clone(),
                    field_name: field.clone(),
                    null_count: *null_count,
                    total_record_count: result.total_records,
                    percent_null: stats::percent_null(*null_count, result.total_records),
                    hyperlink: hyperlink.clone(),
                    dataset_id: api_id.to_string(),
                    row_id: stable_id(&[&field_id, date]),
                    field_id,
                    date: date.to_string(),
                }
            })
            .collect()
    }
}

impl ProblemRow {
    pub fn from_result(result: &DatasetResult) -> Option<Self> {
        result.problem.as_ref().map(|p| ProblemRow {
            dataset_name: result.descriptor.name.clone(),
            message: p.message.clone(),
            resource: p.resource.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::DatasetDescriptor, records::record_from_json, schema::FieldSchema,
        tally::NullCounters,
    };

    const ROOT: &str = "https://opendata.example.gov/resource";

    fn sample_result() -> DatasetResult {
        let schema = FieldSchema::new(vec!["a".into(), "b".into()]);
        let mut counters = NullCounters::for_schema(&schema);
        counters.tally(&[
            record_from_json(r#"{"a": 1}"#),
            record_from_json(r#"{"a": 1, "b": 2}"#),
        ]);
        DatasetResult::completed(
            DatasetDescriptor::new("Bridges", "abcd-1234", "SHA"),
            &schema,
            &counters,
            2,
        )
    }

    #[test]
    fn overview_row_ids_and_links() {
        let row = OverviewRow::from_result(&sample_result(), ROOT, "2026-08-29");
        assert_eq!(row.row_id, "abcd-1234.2026-08-29");
        assert_eq!(
            row.hyperlink,
            "https://opendata.example.gov/resource/abcd-1234"
        );
        assert_eq!(row.total_value_count, 4);
        assert_eq!(row.percent_null, 25.0);
    }

    #[test]
    fn field_rows_cover_every_schema_field() {
        let rows = FieldRow::rows_from_result(&sample_result(), ROOT, "2026-08-29");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].field_name, "a");
        assert_eq!(rows[0].null_count, 0);
        assert_eq!(rows[1].field_name, "b");
        assert_eq!(rows[1].null_count, 1);
        assert_eq!(rows[1].percent_null, 50.0);
        assert_eq!(rows[1].field_id, "abcd-1234.b");
        assert_eq!(rows[1].row_id, "abcd-1234.b.2026-08-29");
    }

    #[test]
    fn problem_row_only_for_problem_results() {
        assert!(ProblemRow::from_result(&sample_result()).is_none());

        let problem = DatasetResult::problem(
            DatasetDescriptor::new("Crashes", "wxyz-0000", "MSP"),
            "Response object was empty".into(),
            "https://opendata.example.gov/resource/wxyz-0000.json?$limit=10000".into(),
        );
        let row = ProblemRow::from_result(&problem).unwrap();
        assert_eq!(row.dataset_name, "Crashes");
        assert_eq!(row.message, "Response object was empty");
    }
}
