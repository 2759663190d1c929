use crate::error::EngineError;
use chrono::NaiveDate;
use connectors::http::upsert::{DeleteRow, ReportStore};
use model::pagination::PageRequest;
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tokio::time::sleep;
use tracing::{info, warn};

/// Ages published rows out of a reporting dataset: pages through it with
/// the same offset convention as inspection, collects row ids dated before
/// the cutoff, and publishes one batch of delete-upserts.
pub struct RetentionSweep {
    store: Arc<dyn ReportStore>,
    page_limit: usize,
    page_delay: Duration,
}

/// What one sweep over a dataset found.
#[derive(Debug, Clone, Default)]
pub struct SweepReport {
    pub rows_scanned: usize,
    pub outdated: Vec<DeleteRow>,
}

impl RetentionSweep {
    pub fn new(store: Arc<dyn ReportStore>, page_limit: usize, page_delay: Duration) -> Self {
        RetentionSweep {
            store,
            page_limit,
            page_delay,
        }
    }

    /// Pages through one reporting dataset collecting rows older than the
    /// cutoff. Rows without a parseable date or a row id are skipped with a
    /// warning rather than deleted blind.
    pub async fn collect(
        &self,
        dataset_id: &str,
        cutoff: NaiveDate,
    ) -> Result<SweepReport, EngineError> {
        let mut report = SweepReport::default();
        let mut offset = 0;
        let mut cumulative = 0;

        loop {
            let request = PageRequest::new(dataset_id, self.page_limit, offset, cumulative);
            let rows = self
                .store
                .fetch_rows(&request)
                .await
                .map_err(EngineError::Retention)?;
            if rows.is_empty() {
                break;
            }

            for row in &rows {
                report.rows_scanned += 1;
                let date = row.get("date").and_then(Value::as_str);
                let row_id = row.get("row_id").and_then(Value::as_str);
                match (date.and_then(parse_row_date), row_id) {
                    (Some(date), Some(row_id)) => {
                        if date < cutoff {
                            report.outdated.push(DeleteRow::new(row_id));
                        }
                    }
                    _ => warn!("Skipping row without usable date/row_id in {dataset_id}"),
                }
            }

            let page_size = rows.len();
            cumulative += page_size;
            if page_size == self.page_limit {
                sleep(self.page_delay).await;
                offset += page_size;
            } else {
                break;
            }
        }

        info!(
            "Sweep of {dataset_id}: {} rows scanned, {} outdated",
            report.rows_scanned,
            report.outdated.len()
        );
        Ok(report)
    }

    /// Publishes the collected delete-upserts in one batch.
    pub async fn apply(
        &self,
        dataset_id: &str,
        outdated: &[DeleteRow],
    ) -> Result<(), EngineError> {
        if outdated.is_empty() {
            info!("Nothing to delete in {dataset_id}");
            return Ok(());
        }
        self.store
            .upsert_deletes(dataset_id, outdated)
            .await
            .map_err(EngineError::Retention)?;
        info!("Deleted {} rows from {dataset_id}", outdated.len());
        Ok(())
    }
}

/// Dates in the reporting datasets are `YYYY-MM-DD`, sometimes with a time
/// suffix. Only the date part matters for retention.
fn parse_row_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
