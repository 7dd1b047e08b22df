use crate::domain::metrics::{snapshot::MetricSnapshot, tree::MetricTree};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct UpdateMetricsRequest {
    pub metric_tree: MetricTree,
}

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub snapshot: Option<MetricSnapshot>,
}
