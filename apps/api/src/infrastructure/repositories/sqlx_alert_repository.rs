use super::parse_column;
use crate::domain::{
    alert::{
        entity::{Alert, NewAlert},
        repository::AlertRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};
use uuid::Uuid;

const COLUMNS: &str =
    "id, warehouse_id, metric_id, severity, score, ai_summary, resolved_at, created_at, updated_at";

#[derive(FromRow)]
struct AlertRow {
    id: Uuid,
    warehouse_id: String,
    metric_id: String,
    severity: String,
    score: f64,
    ai_summary: Option<String>,
    resolved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AlertRow> for Alert {
    type Error = DomainError;

    fn try_from(r: AlertRow) -> Result<Self, Self::Error> {
        Ok(Alert {
            severity: parse_column("severity", &r.severity)?,
            id: r.id,
            warehouse_id: r.warehouse_id,
            metric_id: r.metric_id,
            score: r.score,
            ai_summary: r.ai_summary,
            resolved_at: r.resolved_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn into_alerts(rows: Vec<AlertRow>) -> Result<Vec<Alert>, DomainError> {
    rows.into_iter().map(Alert::try_from).collect()
}

pub struct SqlxAlertRepository {
    pub pool: PgPool,
}

impl SqlxAlertRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxAlertRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl AlertRepository for SqlxAlertRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Alert>, DomainError> {
        let sql = format!("SELECT {} FROM alerts ORDER BY created_at DESC", COLUMNS);
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        into_alerts(rows)
    }

    #[instrument(skip(self))]
    async fn list_open_for(&self, warehouse_id: &str) -> Result<Vec<Alert>, DomainError> {
        let sql = format!(
            "SELECT {} FROM alerts WHERE warehouse_id = $1 AND resolved_at IS NULL \
             ORDER BY created_at DESC",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(warehouse_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        into_alerts(rows)
    }

    #[instrument(skip(self))]
    async fn list_for_since(
        &self,
        warehouse_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Alert>, DomainError> {
        let sql = format!(
            "SELECT {} FROM alerts WHERE warehouse_id = $1 AND created_at >= $2 \
             ORDER BY created_at ASC",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(warehouse_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        into_alerts(rows)
    }

    #[instrument(skip(self, alert), fields(warehouse_id = %alert.warehouse_id, metric_id = %alert.metric_id))]
    async fn create(&self, alert: &NewAlert) -> Result<Alert, DomainError> {
        let sql = format!(
            "INSERT INTO alerts (id, warehouse_id, metric_id, severity, score, ai_summary) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(&alert.warehouse_id)
            .bind(&alert.metric_id)
            .bind(alert.severity.as_str())
            .bind(alert.score)
            .bind(&alert.ai_summary)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        row.try_into()
    }

    #[instrument(skip(self), fields(alert_id = %id))]
    async fn resolve(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<Alert>, DomainError> {
        let sql = format!(
            "UPDATE alerts SET resolved_at = $2, updated_at = $2 WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        sqlx::query_as::<_, AlertRow>(&sql)
            .bind(id)
            .bind(at)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?
            .map(Alert::try_from)
            .transpose()
    }

    #[instrument(skip(self), fields(alert_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_for_metric(&self, warehouse_id: &str, metric_id: &str) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM alerts WHERE warehouse_id = $1 AND metric_id = $2")
            .bind(warehouse_id)
            .bind(metric_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
