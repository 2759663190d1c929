use crate::{
    http::upsert::UpsertClient,
    sink::{SinkError, StatsSink},
};
use async_trait::async_trait;
use model::report::{FieldRow, OverviewRow};
use tracing::{debug, warn};

/// Statistics recorder that upserts rows into the portal's two reporting
/// datasets through the authenticated write API. A failed upsert is logged
/// and dropped rather than failing the run; the local problem and stats
/// files remain the durable record.
pub struct RemoteStatsSink {
    client: UpsertClient,
    overview_dataset_id: String,
    field_dataset_id: String,
}

impl RemoteStatsSink {
    pub fn new(
        client: UpsertClient,
        overview_dataset_id: &str,
        field_dataset_id: &str,
    ) -> Self {
        RemoteStatsSink {
            client,
            overview_dataset_id: overview_dataset_id.to_string(),
            field_dataset_id: field_dataset_id.to_string(),
        }
    }
}

#[async_trait]
impl StatsSink for RemoteStatsSink {
    async fn record_overview(&self, row: &OverviewRow) -> Result<(), SinkError> {
        match self
            .client
            .upsert(&self.overview_dataset_id, std::slice::from_ref(row))
            .await
        {
            Ok(()) => debug!("Upserted overview row {}", row.row_id),
            Err(err) => warn!(
                "Error upserting to {}: {err}",
                self.overview_dataset_id
            ),
        }
        Ok(())
    }

    async fn record_fields(&self, rows: &[FieldRow]) -> Result<(), SinkError> {
        if rows.is_empty() {
            return Ok(());
        }
        match self.client.upsert(&self.field_dataset_id, rows).await {
            Ok(()) => debug!("Upserted {} field rows", rows.len()),
            Err(err) => warn!("Error upserting to {}: {err}", self.field_dataset_id),
        }
        Ok(())
    }
}
