use crate::sink::{ProblemSink, SinkError, StatsSink};
use async_trait::async_trait;
use csv::{Writer, WriterBuilder};
use model::{
    report::{FieldRow, OverviewRow, ProblemRow},
    summary::RunSummary,
};
use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::info;

pub const OVERVIEW_STATS_FILE_NAME: &str = "_OVERVIEW_STATS";
pub const FIELD_LEVEL_STATS_FILE_NAME: &str = "_FIELD_LEVEL_STATS";
pub const PROBLEM_DATASETS_FILE_NAME: &str = "_PROBLEM_DATASETS";
pub const PERFORMANCE_SUMMARY_FILE_NAME: &str = "__run_performance_summary";

/// `{date}_{name}.csv`, so consecutive daily runs never clobber each other.
pub fn dated_file_name(date: &str, name: &str) -> String {
    format!("{date}_{name}.csv")
}

/// Opens a CSV writer for `path`. A fresh file gets a header row derived
/// from the serialized struct; an existing file is appended to without one.
fn open_writer(path: &Path) -> Result<Writer<File>, SinkError> {
    let exists = path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(WriterBuilder::new().has_headers(!exists).from_writer(file))
}

/// Statistics recorder appending to date-stamped CSV files in an output
/// directory.
pub struct CsvStatsSink {
    overview: Mutex<Writer<File>>,
    fields: Mutex<Writer<File>>,
}

impl CsvStatsSink {
    pub fn create(output_dir: &Path, date: &str) -> Result<Self, SinkError> {
        std::fs::create_dir_all(output_dir)?;
        let overview_path = output_dir.join(dated_file_name(date, OVERVIEW_STATS_FILE_NAME));
        let fields_path = output_dir.join(dated_file_name(date, FIELD_LEVEL_STATS_FILE_NAME));
        info!(
            "Writing statistics to {} and {}",
            overview_path.display(),
            fields_path.display()
        );
        Ok(CsvStatsSink {
            overview: Mutex::new(open_writer(&overview_path)?),
            fields: Mutex::new(open_writer(&fields_path)?),
        })
    }
}

#[async_trait]
impl StatsSink for CsvStatsSink {
    async fn record_overview(&self, row: &OverviewRow) -> Result<(), SinkError> {
        let mut writer = self.overview.lock().map_err(|_| SinkError::Poisoned)?;
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }

    async fn record_fields(&self, rows: &[FieldRow]) -> Result<(), SinkError> {
        let mut writer = self.fields.lock().map_err(|_| SinkError::Poisoned)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Problem recorder appending to a date-stamped CSV file. The file (with
/// its header) is created up front so a clean run still leaves evidence
/// that problems were looked for.
pub struct CsvProblemSink {
    path: PathBuf,
    writer: Mutex<Writer<File>>,
}

impl CsvProblemSink {
    pub fn create(output_dir: &Path, date: &str) -> Result<Self, SinkError> {
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(dated_file_name(date, PROBLEM_DATASETS_FILE_NAME));
        let fresh = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if fresh {
            writer.write_record(["DATASET NAME", "PROBLEM MESSAGE", "RESOURCE"])?;
            writer.flush()?;
        }
        Ok(CsvProblemSink {
            path,
            writer: Mutex::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProblemSink for CsvProblemSink {
    async fn report(&self, row: &ProblemRow) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}

/// Writes the run performance summary as key/value CSV lines.
pub fn write_performance_summary(
    output_dir: &Path,
    date: &str,
    summary: &RunSummary,
) -> Result<PathBuf, SinkError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(dated_file_name(date, PERFORMANCE_SUMMARY_FILE_NAME));
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(&path)?;

    writer.write_record(["Date", date])?;
    writer.write_record([
        "Number of datasets in catalog",
        &summary.datasets_in_catalog.to_string(),
    ])?;
    writer.write_record(["Total datasets processed", &summary.processed.to_string()])?;
    writer.write_record([
        "Valid datasets with nulls count",
        &summary.with_nulls.to_string(),
    ])?;
    writer.write_record([
        "Valid datasets without nulls count",
        &summary.clean.to_string(),
    ])?;
    writer.write_record(["Problematic datasets count", &summary.problem.to_string()])?;
    writer.write_record([
        "Process time (minutes)",
        &format!("{:.2}", summary.elapsed_minutes()),
    ])?;
    writer.flush()?;
    Ok(path)
}
