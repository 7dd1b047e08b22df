use super::entity::{Alert, NewAlert};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Newest first.
    async fn list_all(&self) -> Result<Vec<Alert>, DomainError>;
    /// Unresolved alerts of one warehouse, newest first.
    async fn list_open_for(&self, warehouse_id: &str) -> Result<Vec<Alert>, DomainError>;
    /// Every alert created at or after `since`, oldest first.
    async fn list_for_since(
        &self,
        warehouse_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Alert>, DomainError>;
    async fn create(&self, alert: &NewAlert) -> Result<Alert, DomainError>;
    async fn resolve(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<Alert>, DomainError>;
    /// `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn delete_for_metric(&self, warehouse_id: &str, metric_id: &str) -> Result<u64, DomainError>;
}
