use super::status::MetricStatus;
use super::tree::MetricTree;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One immutable capture of every metric score for a warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub id: Uuid,
    pub warehouse_id: String,
    pub timestamp: DateTime<Utc>,
    pub metric_tree: MetricTree,
    pub root_score: f64,
    pub root_status: MetricStatus,
    pub created_at: DateTime<Utc>,
}

/// A snapshot about to be written. Root fields are always derived from the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSnapshot {
    pub warehouse_id: String,
    pub timestamp: DateTime<Utc>,
    pub metric_tree: MetricTree,
    pub root_score: f64,
    pub root_status: MetricStatus,
}

impl NewSnapshot {
    pub fn derive(warehouse_id: impl Into<String>, timestamp: DateTime<Utc>, metric_tree: MetricTree) -> Self {
        let root_score = metric_tree.root_score();
        Self {
            warehouse_id: warehouse_id.into(),
            timestamp,
            root_status: MetricStatus::classify(root_score),
            root_score,
            metric_tree,
        }
    }

    pub fn into_snapshot(self, id: Uuid, created_at: DateTime<Utc>) -> MetricSnapshot {
        MetricSnapshot {
            id,
            warehouse_id: self.warehouse_id,
            timestamp: self.timestamp,
            metric_tree: self.metric_tree,
            root_score: self.root_score,
            root_status: self.root_status,
            created_at,
        }
    }
}
