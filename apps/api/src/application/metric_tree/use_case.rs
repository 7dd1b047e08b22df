use super::dto::{EnrichedSnapshot, MetricTrend, TreeOverview, WarehouseTree};
use crate::domain::{
    metrics::{
        aggregation::trend,
        definition::MetricCatalog,
        repository::{MetricDefinitionRepository, SnapshotRepository},
    },
    shared::{errors::DomainError, time_window::LookbackDays},
    warehouse::repository::WarehouseRepository,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Active warehouses and the newest enriched tree of each.
pub struct GetTreeOverviewUseCase {
    warehouses: Arc<dyn WarehouseRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    definitions: Arc<dyn MetricDefinitionRepository>,
}

impl GetTreeOverviewUseCase {
    pub fn new(
        warehouses: Arc<dyn WarehouseRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        definitions: Arc<dyn MetricDefinitionRepository>,
    ) -> Self {
        Self {
            warehouses,
            snapshots,
            definitions,
        }
    }

    pub async fn execute(&self, warehouse_id: Option<String>, now: DateTime<Utc>) -> Result<TreeOverview, DomainError> {
        let warehouses = self.warehouses.list(true).await?;
        let latest = self.snapshots.latest_per_warehouse(warehouse_id).await?;
        let catalog: MetricCatalog = self.definitions.list().await?.into_iter().collect();

        let snapshots = latest
            .into_iter()
            .map(|s| EnrichedSnapshot {
                metric_tree: s.metric_tree.enrich(&catalog),
                id: s.id,
                warehouse_id: s.warehouse_id,
                timestamp: s.timestamp,
                root_score: s.root_score,
                root_status: s.root_status,
            })
            .collect();

        Ok(TreeOverview {
            warehouses,
            snapshots,
            timestamp: now,
        })
    }
}

/// Latest snapshot plus history for one warehouse.
pub struct GetWarehouseTreeUseCase {
    warehouses: Arc<dyn WarehouseRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    definitions: Arc<dyn MetricDefinitionRepository>,
}

impl GetWarehouseTreeUseCase {
    pub fn new(
        warehouses: Arc<dyn WarehouseRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        definitions: Arc<dyn MetricDefinitionRepository>,
    ) -> Self {
        Self {
            warehouses,
            snapshots,
            definitions,
        }
    }

    pub async fn execute(
        &self,
        warehouse_id: &str,
        days: LookbackDays,
        now: DateTime<Utc>,
    ) -> Result<WarehouseTree, DomainError> {
        let warehouse = self
            .warehouses
            .find_by_id(warehouse_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("warehouse {}", warehouse_id)))?;

        let snapshot = self
            .snapshots
            .latest_for(warehouse_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("no data for warehouse {}", warehouse_id)))?;

        let historical = self.snapshots.since(warehouse_id, days.since(now)).await?;
        let metric_definitions = self.definitions.list().await?;

        Ok(WarehouseTree {
            warehouse,
            snapshot,
            historical,
            metric_definitions,
        })
    }
}

pub struct GetMetricTrendUseCase {
    snapshots: Arc<dyn SnapshotRepository>,
}

impl GetMetricTrendUseCase {
    pub fn new(snapshots: Arc<dyn SnapshotRepository>) -> Self {
        Self { snapshots }
    }

    pub async fn execute(
        &self,
        metric_id: &str,
        warehouse_id: &str,
        days: LookbackDays,
        now: DateTime<Utc>,
    ) -> Result<MetricTrend, DomainError> {
        let history = self.snapshots.since(warehouse_id, days.since(now)).await?;

        Ok(MetricTrend {
            metric_id: metric_id.to_string(),
            warehouse_id: warehouse_id.to_string(),
            data: trend(&history, metric_id),
            period: days.period_label(),
        })
    }
}
