use crate::domain::metrics::status::MetricStatus;
use crate::infrastructure::ml::traits::AnomalyAnalysis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IngestRequest {
    #[validate(length(min = 1))]
    pub warehouse_id: String,
    pub metric_id: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: f64,
    #[validate(range(min = 1))]
    pub orders_volume: i64,
    #[validate(range(min = 1))]
    pub staff_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestedData {
    pub snapshot_id: Uuid,
    pub warehouse_id: String,
    pub metric_id: String,
    pub score: f64,
    pub status: MetricStatus,
    pub rolling_7d_avg: f64,
    pub root_score: f64,
    pub root_status: MetricStatus,
    pub alert_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    pub message: String,
    pub data: IngestedData,
    pub ml_analysis: AnomalyAnalysis,
}
