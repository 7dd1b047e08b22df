use crate::domain::{
    alert::entity::{Alert, AlertSeverity},
    metrics::{aggregation::ScoreSummary, snapshot::MetricSnapshot, status::MetricStatus, tree::MetricTree},
    warehouse::entity::Warehouse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WarehouseReport {
    pub warehouse: Warehouse,
    pub period: String,
    pub summary: ScoreSummary,
    pub snapshots: Vec<MetricSnapshot>,
    pub alerts: Vec<Alert>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExportedSnapshot {
    pub timestamp: DateTime<Utc>,
    pub root_score: f64,
    pub root_status: MetricStatus,
    pub metric_tree: MetricTree,
}

#[derive(Debug, Serialize)]
pub struct ExportedAlert {
    pub created_at: DateTime<Utc>,
    pub metric_id: String,
    pub severity: AlertSeverity,
    pub score: f64,
    pub ai_summary: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct WarehouseExport {
    pub warehouse: Warehouse,
    pub export_date: DateTime<Utc>,
    pub snapshots: Vec<ExportedSnapshot>,
    pub alerts: Vec<ExportedAlert>,
}
