use crate::result::{DatasetResult, DatasetStatus};
use serde::Serialize;
use std::time::Duration;

/// Run-level accounting handed to the performance reporting collaborator.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Datasets enumerated by the catalog, whether or not they were reached.
    pub datasets_in_catalog: usize,
    pub processed: usize,
    pub clean: usize,
    pub with_nulls: usize,
    pub problem: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn new(datasets_in_catalog: usize) -> Self {
        RunSummary {
            datasets_in_catalog,
            ..Default::default()
        }
    }

    pub fn record(&mut self, result: &DatasetResult) {
        self.processed += 1;
        match result.status {
            DatasetStatus::Clean => self.clean += 1,
            DatasetStatus::WithNulls => self.with_nulls += 1,
            DatasetStatus::Problem => self.problem += 1,
        }
    }

    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed.as_secs_f64() / 60.0
    }
}
