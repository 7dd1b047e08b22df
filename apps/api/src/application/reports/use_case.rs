use super::dto::{ExportedAlert, ExportedSnapshot, WarehouseExport, WarehouseReport};
use crate::domain::{
    alert::{entity::AlertSeverity, repository::AlertRepository},
    metrics::{aggregation::ScoreSummary, repository::SnapshotRepository},
    shared::{errors::DomainError, time_window::LookbackDays},
    warehouse::{entity::Warehouse, repository::WarehouseRepository},
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub const EXPORT_WINDOW_DAYS: i64 = 30;

pub struct ReportsUseCase {
    warehouses: Arc<dyn WarehouseRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    alerts: Arc<dyn AlertRepository>,
}

impl ReportsUseCase {
    pub fn new(
        warehouses: Arc<dyn WarehouseRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        alerts: Arc<dyn AlertRepository>,
    ) -> Self {
        Self {
            warehouses,
            snapshots,
            alerts,
        }
    }

    async fn warehouse(&self, warehouse_id: &str) -> Result<Warehouse, DomainError> {
        self.warehouses
            .find_by_id(warehouse_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("warehouse {}", warehouse_id)))
    }

    /// Root-score summary over the window plus the currently open alerts.
    pub async fn summary(
        &self,
        warehouse_id: &str,
        days: LookbackDays,
        now: DateTime<Utc>,
    ) -> Result<WarehouseReport, DomainError> {
        let warehouse = self.warehouse(warehouse_id).await?;
        let snapshots = self.snapshots.since(warehouse_id, days.since(now)).await?;
        let alerts = self.alerts.list_open_for(warehouse_id).await?;

        let root_scores: Vec<f64> = snapshots.iter().map(|s| s.root_score).collect();
        let critical = alerts
            .iter()
            .filter(|a| a.severity == AlertSeverity::Critical)
            .count();

        Ok(WarehouseReport {
            warehouse,
            period: days.period_label(),
            summary: ScoreSummary::from_root_scores(&root_scores, critical, alerts.len()),
            snapshots,
            alerts,
            generated_at: now,
        })
    }

    /// Last 30 days of snapshots and alerts, oldest first.
    pub async fn export(&self, warehouse_id: &str, now: DateTime<Utc>) -> Result<WarehouseExport, DomainError> {
        let warehouse = self.warehouse(warehouse_id).await?;
        let since = now - chrono::Duration::days(EXPORT_WINDOW_DAYS);
        let snapshots = self.snapshots.since(warehouse_id, since).await?;
        let alerts = self.alerts.list_for_since(warehouse_id, since).await?;

        Ok(WarehouseExport {
            warehouse,
            export_date: now,
            snapshots: snapshots
                .into_iter()
                .map(|s| ExportedSnapshot {
                    timestamp: s.timestamp,
                    root_score: s.root_score,
                    root_status: s.root_status,
                    metric_tree: s.metric_tree,
                })
                .collect(),
            alerts: alerts
                .into_iter()
                .map(|a| ExportedAlert {
                    created_at: a.created_at,
                    metric_id: a.metric_id,
                    severity: a.severity,
                    score: a.score,
                    ai_summary: a.ai_summary,
                    resolved_at: a.resolved_at,
                })
                .collect(),
        })
    }
}
