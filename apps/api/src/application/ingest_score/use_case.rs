use super::dto::{IngestRequest, IngestResponse, IngestedData};
use crate::domain::{
    alert::{
        entity::{AlertSeverity, NewAlert},
        repository::AlertRepository,
    },
    metrics::{
        aggregation::rolling_average,
        definition::MetricId,
        repository::SnapshotRepository,
        snapshot::NewSnapshot,
        status::MetricStatus,
        tree::MetricNode,
    },
    shared::{errors::DomainError, time_window::LookbackDays},
    warehouse::repository::WarehouseRepository,
};
use crate::infrastructure::ml::traits::{AnalyzeRequest, MlEngine, analyze_or_fallback};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::sync::Arc;
use validator::Validate;

/// Accepts one metric reading and folds it into a new snapshot.
///
/// Steps, in order: validate, compute the pre-write rolling average, ask the
/// ML engine for an anomaly verdict (falling back on failure), carry the
/// latest tree forward with the new reading, and raise an alert when the
/// reading is not healthy.
pub struct IngestScoreUseCase {
    warehouses: Arc<dyn WarehouseRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    alerts: Arc<dyn AlertRepository>,
    ml_engine: Arc<dyn MlEngine>,
}

impl IngestScoreUseCase {
    pub fn new(
        warehouses: Arc<dyn WarehouseRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        alerts: Arc<dyn AlertRepository>,
        ml_engine: Arc<dyn MlEngine>,
    ) -> Self {
        Self {
            warehouses,
            snapshots,
            alerts,
            ml_engine,
        }
    }

    pub async fn execute(&self, request: IngestRequest, now: DateTime<Utc>) -> Result<IngestResponse, DomainError> {
        request.validate()?;
        MetricId::new(request.metric_id.as_str())?;

        let warehouse = self
            .warehouses
            .find_by_id(&request.warehouse_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("warehouse {}", request.warehouse_id)))?;

        let history = self
            .snapshots
            .since(&warehouse.id, LookbackDays::default().since(now))
            .await?;
        let rolling_7d_avg = rolling_average(&history, &request.metric_id);

        let ml_analysis = analyze_or_fallback(
            self.ml_engine.as_ref(),
            &AnalyzeRequest {
                score: request.score,
                rolling_avg_7d: if rolling_7d_avg == 0.0 {
                    request.score
                } else {
                    rolling_7d_avg
                },
                hour_of_day: now.hour(),
                day_of_week: now.weekday().num_days_from_sunday(),
                orders_volume: request.orders_volume,
                staff_count: request.staff_count,
                warehouse_id: warehouse.id.clone(),
                metric_id: request.metric_id.clone(),
            },
        )
        .await;

        let status = MetricStatus::classify(request.score);
        let node = MetricNode::scored(request.score, status)
            .with_field("ordersVolume", request.orders_volume)
            .with_field("staffCount", request.staff_count);

        let latest_tree = self
            .snapshots
            .latest_for(&warehouse.id)
            .await?
            .map(|s| s.metric_tree)
            .unwrap_or_default();
        let snapshot = self
            .snapshots
            .insert(&NewSnapshot::derive(
                warehouse.id.as_str(),
                now,
                latest_tree.carry_forward(&request.metric_id, node),
            ))
            .await?;

        let alert_id = match AlertSeverity::for_status(status) {
            Some(severity) => {
                let alert = self
                    .alerts
                    .create(&NewAlert {
                        warehouse_id: warehouse.id.clone(),
                        metric_id: request.metric_id.clone(),
                        severity,
                        score: request.score,
                        ai_summary: Some(alert_summary(&warehouse.name, &request, status, ml_analysis.is_anomaly)),
                    })
                    .await?;
                Some(alert.id)
            }
            None => None,
        };

        tracing::info!(
            warehouse_id = %warehouse.id,
            metric_id = %request.metric_id,
            score = request.score,
            %status,
            is_anomaly = ml_analysis.is_anomaly,
            "Metric ingested"
        );

        Ok(IngestResponse {
            message: "Data successfully ingested and analyzed".to_string(),
            data: IngestedData {
                snapshot_id: snapshot.id,
                warehouse_id: warehouse.id,
                metric_id: request.metric_id,
                score: request.score,
                status,
                rolling_7d_avg,
                root_score: snapshot.root_score,
                root_status: snapshot.root_status,
                alert_id,
                timestamp: snapshot.timestamp,
            },
            ml_analysis,
        })
    }
}

fn alert_summary(warehouse_name: &str, request: &IngestRequest, status: MetricStatus, is_anomaly: bool) -> String {
    let mut summary = format!(
        "{} at {} reported {:.1} ({}) with {} orders and {} staff.",
        request.metric_id, warehouse_name, request.score, status, request.orders_volume, request.staff_count
    );
    if is_anomaly {
        summary.push_str(" Flagged as anomalous by the ML engine.");
    }
    summary
}
