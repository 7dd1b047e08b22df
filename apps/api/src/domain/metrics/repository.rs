use super::definition::MetricDefinition;
use super::snapshot::{MetricSnapshot, NewSnapshot};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn insert(&self, snapshot: &NewSnapshot) -> Result<MetricSnapshot, DomainError>;
    async fn latest_for(&self, warehouse_id: &str) -> Result<Option<MetricSnapshot>, DomainError>;
    /// Newest snapshot of every warehouse, or of one when filtered.
    async fn latest_per_warehouse(
        &self,
        warehouse_id: Option<String>,
    ) -> Result<Vec<MetricSnapshot>, DomainError>;
    /// Snapshots at or after `since`, oldest first.
    async fn since(
        &self,
        warehouse_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricSnapshot>, DomainError>;
    async fn delete_for_warehouse(&self, warehouse_id: &str) -> Result<u64, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricDefinitionRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<MetricDefinition>, DomainError>;
    /// Inserts or refreshes definitions keyed by metric id.
    async fn upsert_many(&self, definitions: &[MetricDefinition]) -> Result<(), DomainError>;
}
