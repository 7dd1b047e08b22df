use super::dto::CreateWarehouseRequest;
use crate::application::forecast::dto::WarehouseInput;
use crate::domain::{
    shared::errors::DomainError,
    warehouse::{
        entity::{NewWarehouse, Warehouse, WarehouseChanges},
        repository::WarehouseRepository,
        value_objects::WarehouseId,
    },
};
use std::sync::Arc;
use validator::Validate;

pub struct WarehousesUseCase {
    warehouses: Arc<dyn WarehouseRepository>,
}

impl WarehousesUseCase {
    pub fn new(warehouses: Arc<dyn WarehouseRepository>) -> Self {
        Self { warehouses }
    }

    pub async fn list_active(&self) -> Result<Vec<Warehouse>, DomainError> {
        self.warehouses.list(true).await
    }

    pub async fn list_all(&self) -> Result<Vec<Warehouse>, DomainError> {
        self.warehouses.list(false).await
    }

    pub async fn get(&self, id: &str) -> Result<Warehouse, DomainError> {
        self.warehouses
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("warehouse {}", id)))
    }

    /// Assigns the next `wh_NNN` id from the current row count.
    pub async fn create_next(&self, request: CreateWarehouseRequest) -> Result<Warehouse, DomainError> {
        request.validate()?;
        let id = WarehouseId::sequential(self.warehouses.count().await? + 1).into_inner();
        let warehouse = self
            .warehouses
            .create(&NewWarehouse {
                id,
                name: request.name.trim().to_string(),
                zone: request.zone,
                city: request.city.trim().to_string(),
                is_active: true,
            })
            .await?;
        tracing::info!(warehouse_id = %warehouse.id, "Warehouse created");
        Ok(warehouse)
    }

    pub async fn create_with_id(&self, input: WarehouseInput) -> Result<Warehouse, DomainError> {
        let id = WarehouseId::new(input.id)?.into_inner();
        self.warehouses
            .create(&NewWarehouse {
                id,
                name: input.name,
                zone: input.zone,
                city: input.city,
                is_active: input.is_active.unwrap_or(true),
            })
            .await
    }

    pub async fn update(&self, id: &str, changes: WarehouseChanges) -> Result<Warehouse, DomainError> {
        if changes.is_empty() {
            return Err(DomainError::ValidationError("Nothing to update".into()));
        }
        self.warehouses
            .update(id, &changes)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("warehouse {}", id)))
    }
}
