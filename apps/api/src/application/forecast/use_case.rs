use super::dto::{ForecastInput, WarehouseSetupRequest, WarehouseSetupResponse};
use crate::domain::{
    metrics::{
        aggregation::{Forecast, OperatingConditions},
        definition::{MetricId, ROOT_METRIC_ID},
        repository::SnapshotRepository,
        snapshot::NewSnapshot,
        status::MetricStatus,
        tree::MetricNode,
    },
    shared::{errors::DomainError, time_window::LookbackDays},
    warehouse::{entity::NewWarehouse, repository::WarehouseRepository, value_objects::WarehouseId},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Rolling 7-day average of one metric and the score it predicts.
pub struct ForecastUseCase {
    snapshots: Arc<dyn SnapshotRepository>,
}

impl ForecastUseCase {
    pub fn new(snapshots: Arc<dyn SnapshotRepository>) -> Self {
        Self { snapshots }
    }

    pub async fn execute(
        &self,
        warehouse_id: &str,
        input: &ForecastInput,
        now: DateTime<Utc>,
    ) -> Result<Forecast, DomainError> {
        MetricId::new(input.metric_id.as_str())?;
        let conditions = OperatingConditions::new(input.staff_count, input.hours_of_day, input.day_of_week)?;

        let since = LookbackDays::default().since(now);
        let history = self.snapshots.since(warehouse_id, since).await?;
        Ok(Forecast::compute(&history, &input.metric_id, &conditions))
    }
}

/// Upserts a warehouse and records a snapshot carrying the predicted score.
pub struct WarehouseSetupUseCase {
    warehouses: Arc<dyn WarehouseRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
}

impl WarehouseSetupUseCase {
    pub fn new(warehouses: Arc<dyn WarehouseRepository>, snapshots: Arc<dyn SnapshotRepository>) -> Self {
        Self {
            warehouses,
            snapshots,
        }
    }

    pub async fn execute(
        &self,
        request: WarehouseSetupRequest,
        now: DateTime<Utc>,
    ) -> Result<WarehouseSetupResponse, DomainError> {
        let id = WarehouseId::new(request.warehouse.id)?.into_inner();
        let warehouse = self
            .warehouses
            .upsert(&NewWarehouse {
                id: id.clone(),
                name: request.warehouse.name,
                zone: request.warehouse.zone,
                city: request.warehouse.city,
                is_active: request.warehouse.is_active.unwrap_or(true),
            })
            .await?;

        let forecast = ForecastUseCase::new(self.snapshots.clone())
            .execute(&id, &request.metrics, now)
            .await?;

        let latest_tree = self
            .snapshots
            .latest_for(&id)
            .await?
            .map(|s| s.metric_tree)
            .unwrap_or_default();
        let node = MetricNode::scored(forecast.predicted_score, MetricStatus::classify(forecast.predicted_score));
        let mut tree = latest_tree.carry_forward(&request.metrics.metric_id, node.clone());
        // A first setup has no root score yet; seed it with the prediction.
        if tree.score_of(ROOT_METRIC_ID).is_none() {
            tree.insert(ROOT_METRIC_ID, node);
        }

        self.snapshots.insert(&NewSnapshot::derive(id.as_str(), now, tree)).await?;
        tracing::info!(
            warehouse_id = %id,
            metric_id = %request.metrics.metric_id,
            predicted_score = forecast.predicted_score,
            "Warehouse setup recorded"
        );

        Ok(WarehouseSetupResponse {
            message: "Warehouse and metrics updated successfully".to_string(),
            warehouse,
            result: forecast,
        })
    }
}
