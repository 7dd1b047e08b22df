use super::entity::{NewWarehouse, Warehouse, WarehouseChanges};
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    /// Ordered by id.
    async fn list(&self, active_only: bool) -> Result<Vec<Warehouse>, DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Warehouse>, DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;
    /// Fails with `Conflict` when the id is taken.
    async fn create(&self, warehouse: &NewWarehouse) -> Result<Warehouse, DomainError>;
    async fn update(&self, id: &str, changes: &WarehouseChanges) -> Result<Option<Warehouse>, DomainError>;
    async fn upsert(&self, warehouse: &NewWarehouse) -> Result<Warehouse, DomainError>;
    /// Cheap round-trip used by the health check.
    async fn ping(&self) -> Result<(), DomainError>;
}
