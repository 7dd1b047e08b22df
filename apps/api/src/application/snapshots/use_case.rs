use crate::domain::{
    metrics::{
        repository::SnapshotRepository,
        snapshot::{MetricSnapshot, NewSnapshot},
        tree::MetricTree,
    },
    shared::errors::DomainError,
    warehouse::repository::WarehouseRepository,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Writes a snapshot whose root is derived from the tree's `poi` entry.
pub struct RecordSnapshotUseCase {
    warehouses: Arc<dyn WarehouseRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
}

impl RecordSnapshotUseCase {
    pub fn new(warehouses: Arc<dyn WarehouseRepository>, snapshots: Arc<dyn SnapshotRepository>) -> Self {
        Self {
            warehouses,
            snapshots,
        }
    }

    pub async fn execute(
        &self,
        warehouse_id: &str,
        metric_tree: MetricTree,
        now: DateTime<Utc>,
    ) -> Result<MetricSnapshot, DomainError> {
        if self.warehouses.find_by_id(warehouse_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("warehouse {}", warehouse_id)));
        }

        let snapshot = NewSnapshot::derive(warehouse_id, now, metric_tree);
        tracing::debug!(
            warehouse_id,
            root_score = snapshot.root_score,
            root_status = %snapshot.root_status,
            "Recording snapshot"
        );
        self.snapshots.insert(&snapshot).await
    }
}
