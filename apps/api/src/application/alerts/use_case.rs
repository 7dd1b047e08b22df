use crate::domain::{
    alert::{entity::Alert, repository::AlertRepository},
    shared::errors::DomainError,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub struct AlertsUseCase {
    alerts: Arc<dyn AlertRepository>,
}

impl AlertsUseCase {
    pub fn new(alerts: Arc<dyn AlertRepository>) -> Self {
        Self { alerts }
    }

    pub async fn list(&self) -> Result<Vec<Alert>, DomainError> {
        self.alerts.list_all().await
    }

    pub async fn resolve(&self, id: Uuid, now: DateTime<Utc>) -> Result<Alert, DomainError> {
        self.alerts
            .resolve(id, now)
            .await?
            .ok_or_else(|| DomainError::NotFound("alert".into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.alerts.delete(id).await? {
            return Err(DomainError::NotFound("alert".into()));
        }
        Ok(())
    }
}
