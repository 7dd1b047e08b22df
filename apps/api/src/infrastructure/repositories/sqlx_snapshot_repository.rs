use super::parse_column;
use crate::domain::{
    metrics::{
        repository::SnapshotRepository,
        snapshot::{MetricSnapshot, NewSnapshot},
        tree::MetricTree,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const COLUMNS: &str = "id, warehouse_id, timestamp, metric_tree, root_score, root_status, created_at";

#[derive(FromRow)]
struct SnapshotRow {
    id: Uuid,
    warehouse_id: String,
    timestamp: DateTime<Utc>,
    metric_tree: Json<MetricTree>,
    root_score: f64,
    root_status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SnapshotRow> for MetricSnapshot {
    type Error = DomainError;

    fn try_from(r: SnapshotRow) -> Result<Self, Self::Error> {
        Ok(MetricSnapshot {
            root_status: parse_column("root_status", &r.root_status)?,
            id: r.id,
            warehouse_id: r.warehouse_id,
            timestamp: r.timestamp,
            metric_tree: r.metric_tree.0,
            root_score: r.root_score,
            created_at: r.created_at,
        })
    }
}

fn into_snapshots(rows: Vec<SnapshotRow>) -> Result<Vec<MetricSnapshot>, DomainError> {
    rows.into_iter().map(MetricSnapshot::try_from).collect()
}

/// Append-only store of metric trees.
pub struct SqlxSnapshotRepository {
    pub pool: PgPool,
}

impl SqlxSnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxSnapshotRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl SnapshotRepository for SqlxSnapshotRepository {
    #[instrument(skip(self, snapshot), fields(warehouse_id = %snapshot.warehouse_id, root_score = snapshot.root_score))]
    async fn insert(&self, snapshot: &NewSnapshot) -> Result<MetricSnapshot, DomainError> {
        let sql = format!(
            "INSERT INTO metric_snapshots (id, warehouse_id, timestamp, metric_tree, root_score, root_status) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, SnapshotRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(&snapshot.warehouse_id)
            .bind(snapshot.timestamp)
            .bind(Json(&snapshot.metric_tree))
            .bind(snapshot.root_score)
            .bind(snapshot.root_status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to insert snapshot: {}", e);
                DomainError::InfrastructureError(e.to_string())
            })?;
        debug!(snapshot_id = %row.id, "Snapshot stored");
        row.try_into()
    }

    #[instrument(skip(self))]
    async fn latest_for(&self, warehouse_id: &str) -> Result<Option<MetricSnapshot>, DomainError> {
        let sql = format!(
            "SELECT {} FROM metric_snapshots WHERE warehouse_id = $1 \
             ORDER BY timestamp DESC, created_at DESC LIMIT 1",
            COLUMNS
        );
        sqlx::query_as::<_, SnapshotRow>(&sql)
            .bind(warehouse_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?
            .map(MetricSnapshot::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn latest_per_warehouse(
        &self,
        warehouse_id: Option<String>,
    ) -> Result<Vec<MetricSnapshot>, DomainError> {
        let sql = format!(
            "SELECT DISTINCT ON (warehouse_id) {} FROM metric_snapshots \
             WHERE ($1::TEXT IS NULL OR warehouse_id = $1) \
             ORDER BY warehouse_id, timestamp DESC, created_at DESC",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, SnapshotRow>(&sql)
            .bind(warehouse_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        into_snapshots(rows)
    }

    #[instrument(skip(self))]
    async fn since(
        &self,
        warehouse_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MetricSnapshot>, DomainError> {
        let sql = format!(
            "SELECT {} FROM metric_snapshots WHERE warehouse_id = $1 AND timestamp >= $2 \
             ORDER BY timestamp ASC",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, SnapshotRow>(&sql)
            .bind(warehouse_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        into_snapshots(rows)
    }

    #[instrument(skip(self))]
    async fn delete_for_warehouse(&self, warehouse_id: &str) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM metric_snapshots WHERE warehouse_id = $1")
            .bind(warehouse_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
