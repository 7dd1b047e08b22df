use crate::domain::{
    metrics::{
        aggregation::TrendPoint,
        definition::MetricDefinition,
        snapshot::MetricSnapshot,
        status::MetricStatus,
        tree::EnrichedTree,
    },
    warehouse::entity::Warehouse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    #[serde(rename = "warehouseId")]
    pub warehouse_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    #[serde(rename = "warehouseId")]
    pub warehouse_id: Option<String>,
    pub days: Option<i64>,
}

/// Latest snapshot with definitions merged into its tree.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedSnapshot {
    pub id: Uuid,
    pub warehouse_id: String,
    pub timestamp: DateTime<Utc>,
    pub metric_tree: EnrichedTree,
    pub root_score: f64,
    pub root_status: MetricStatus,
}

#[derive(Debug, Serialize)]
pub struct TreeOverview {
    pub warehouses: Vec<Warehouse>,
    pub snapshots: Vec<EnrichedSnapshot>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct WarehouseTree {
    pub warehouse: Warehouse,
    pub snapshot: MetricSnapshot,
    pub historical: Vec<MetricSnapshot>,
    pub metric_definitions: Vec<MetricDefinition>,
}

#[derive(Debug, Serialize)]
pub struct MetricTrend {
    pub metric_id: String,
    pub warehouse_id: String,
    pub data: Vec<TrendPoint>,
    pub period: String,
}
